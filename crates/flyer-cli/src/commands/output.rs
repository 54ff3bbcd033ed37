//! Output formats shared by the process, extract and batch commands.

use chrono::NaiveDate;
use flyer_core::models::config::CalendarConfig;
use flyer_core::{CalendarEvent, EventField, StructuredEvent};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
    /// CSV output
    Csv,
    /// Calendar service insert payload
    Calendar,
}

impl OutputFormat {
    /// File extension used for batch outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Calendar => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Render an event in the requested format.
pub fn format_event(
    event: &StructuredEvent,
    format: OutputFormat,
    calendar: &CalendarConfig,
    today: NaiveDate,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(event)?),
        OutputFormat::Text => Ok(format_text(event)),
        OutputFormat::Csv => format_csv(event),
        OutputFormat::Calendar => {
            let payload = CalendarEvent::from_event(event, calendar, today);
            Ok(serde_json::to_string_pretty(&payload)?)
        }
    }
}

/// Header of the per-event CSV output.
pub const CSV_HEADER: [&str; 7] = [
    "event_name",
    "event_date",
    "event_date_text",
    "event_time",
    "event_location",
    "event_hosts",
    "event_description",
];

/// CSV cells for an event, in [`CSV_HEADER`] order.
pub fn csv_row(event: &StructuredEvent) -> [String; 7] {
    let field = |f: EventField| event.fields.get(f).unwrap_or_default().to_string();
    [
        field(EventField::Name),
        event.event_date.map(|d| d.to_string()).unwrap_or_default(),
        field(EventField::DateText),
        field(EventField::Time),
        field(EventField::Location),
        field(EventField::Hosts),
        field(EventField::Description),
    ]
}

fn format_csv(event: &StructuredEvent) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(event))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(event: &StructuredEvent) -> String {
    let fields = &event.fields;
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    let mut output = String::new();
    output.push_str(&format!("Event:    {}\n", or_dash(fields.event_name.as_deref())));
    output.push_str(&format!(
        "Date:     {}",
        or_dash(fields.event_date_text.as_deref())
    ));
    if let Some(date) = event.event_date {
        output.push_str(&format!(" ({})", date));
    }
    output.push('\n');
    output.push_str(&format!("Time:     {}\n", or_dash(fields.event_time.as_deref())));
    output.push_str(&format!("Location: {}\n", or_dash(fields.event_location.as_deref())));
    output.push_str(&format!("Hosts:    {}\n", or_dash(fields.event_hosts.as_deref())));

    if let Some(description) = &fields.event_description {
        output.push('\n');
        output.push_str(description);
        output.push('\n');
    }

    output
}
