use std::io::{self, Write};

use serde::Serialize;

use crate::app::PatientView;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_view(view: &PatientView) -> io::Result<()> {
        Self::write_json(&mut io::stdout(), view)
    }

    pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
