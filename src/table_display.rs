use binlist_lookup::BinRecord;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => String::new(),
    }
}

/// Field/value rows shown for a record, in display order
pub fn record_rows(record: &BinRecord, use_glyphs: bool) -> Vec<(&'static str, String)> {
    let country = &record.country;
    let country_name = match (&country.name, &country.emoji) {
        (Some(name), Some(emoji)) if use_glyphs => format!("{} {}", emoji, name),
        (Some(name), _) => name.clone(),
        (None, _) => String::new(),
    };

    vec![
        ("Scheme", text(&record.scheme)),
        ("Type", text(&record.card_type)),
        ("Brand", text(&record.brand)),
        ("Prepaid", yes_no(record.prepaid)),
        ("Card number length", number(&record.card_number_length)),
        ("Bank", text(&record.bank.name)),
        ("Country", country_name),
        ("Country code", text(&country.alpha2)),
        ("Numeric code", text(&country.numeric)),
        ("Currency", text(&country.currency)),
        ("Latitude", number(&country.latitude)),
        ("Longitude", number(&country.longitude)),
    ]
}

pub fn display_record(bin: &str, record: &BinRecord, use_glyphs: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("BIN").add_attribute(Attribute::Bold),
        Cell::new(bin).add_attribute(Attribute::Bold),
    ]);

    for (field, value) in record_rows(record, use_glyphs) {
        table.add_row(vec![field.to_string(), value]);
    }

    println!("{table}");
    if record.scheme.is_none() && record.bank.name.is_none() {
        println!("{}", "The service returned no scheme or bank for this BIN.".yellow());
    }
}
