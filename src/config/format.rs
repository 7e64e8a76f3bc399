use config::{FileStoredFormat, Format, Map, Value, ValueKind};
use ini::{Ini, ParseOption};
use std::error::Error;

/// INI that keeps values byte for byte: quotes and backslashes are part of
/// the value, and `;`/`#` only start a comment at the beginning of a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimIni;

impl Format for VerbatimIni {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        let mut map = Map::new();
        for (section, properties) in ini.iter() {
            let mut table = Map::new();
            for (key, value) in properties.iter() {
                table.insert(key.to_owned(), Value::new(uri, ValueKind::String(value.to_owned())));
            }
            match section {
                Some(section) => {
                    map.insert(section.to_owned(), Value::new(uri, ValueKind::Table(table)));
                }
                None => map.extend(table),
            }
        }
        Ok(map)
    }
}

impl FileStoredFormat for VerbatimIni {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }
}
