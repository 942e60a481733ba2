use std::path::Path;

use csv::Writer;

use crate::tnea::cutoff::error::Result;
use crate::tnea::cutoff::model::Table;

/// Writes the table as comma separated text. Nulls become empty fields.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.render_rows("") {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
