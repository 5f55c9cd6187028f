use std::io::Read;

use crate::{account::AccountId, command::CommandKind};
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Row {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub account: AccountId,
    pub to: Option<AccountId>,
    pub amount: Option<Decimal>,
}

/// Parses ledger rows in CSV format, yielding each row with its line number.
pub struct CsvRowParser<R> {
    iter: DeserializeRecordsIntoIter<R, Row>,
}

impl<R> CsvRowParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvRowParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Row, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
