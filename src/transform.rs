use crate::{error::Result, row::Row};

/// A single row-level processing step in a transform chain. Returning
/// `Ok(None)` drops the row from the stream.
pub trait Transform {
    fn process(&self, row: Row) -> Result<Option<Row>>;
}

/// Threads each row through the chain in order, row-at-a-time, collecting
/// the rows that survive every step.
pub fn apply_chain<I>(transforms: &[&dyn Transform], rows: I) -> Result<Vec<Row>>
where
    I: IntoIterator<Item = Row>,
{
    let mut surviving = Vec::new();
    for row in rows {
        let mut current = Some(row);
        for transform in transforms {
            let Some(row) = current else { break };
            current = transform.process(row)?;
        }
        if let Some(row) = current {
            surviving.push(row);
        }
    }
    Ok(surviving)
}
