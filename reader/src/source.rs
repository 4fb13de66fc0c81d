//! Row sources.
//!
//! The reader pulls already-split rows from a [`RowSource`]. Tokenizing
//! (quotes, escapes, delimiters) is the source's job.
//!
//! Two sources ship with the crate:
//!
//! - [`CsvSource`]: wraps the `csv` crate's reader. The inner reader must be
//!   built with `has_headers(false)`, otherwise it swallows the header row
//!   before the binder sees it.
//!   [`SourceOptions::builder`](crate::SourceOptions::builder) takes care of
//!   that.
//! - [`IterSource`]: any iterator of rows, handy for tests and for rows that
//!   come from somewhere other than a byte stream.

use std::convert::Infallible;
use std::error::Error as StdError;
use std::io;

/// Pull-based supplier of rows.
pub trait RowSource {
    /// Error for malformed rows or failed reads.
    type Error: StdError + Send + Sync + 'static;

    /// Next row, or `Ok(None)` once the data is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    type Error = S::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).next_row()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    type Error = S::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).next_row()
    }
}

/// Row source over a `csv::Reader`. One record buffer is reused for every row.
#[derive(Debug)]
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<R: io::Read> CsvSource<R> {
    pub fn new(reader: csv::Reader<R>) -> Self {
        Self {
            reader,
            record: csv::StringRecord::new(),
        }
    }

    pub fn get_ref(&self) -> &csv::Reader<R> {
        &self.reader
    }

    pub fn into_inner(self) -> csv::Reader<R> {
        self.reader
    }
}

impl<R: io::Read> From<csv::Reader<R>> for CsvSource<R> {
    fn from(reader: csv::Reader<R>) -> Self {
        Self::new(reader)
    }
}

impl<R: io::Read> RowSource for CsvSource<R> {
    type Error = csv::Error;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

/// Row source over an iterator of fallible rows.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    rows: I,
}

impl<I> IterSource<I> {
    pub fn new(rows: I) -> Self {
        Self { rows }
    }

    pub fn into_inner(self) -> I {
        self.rows
    }
}

impl<I, E> RowSource for IterSource<I>
where
    I: Iterator<Item = Result<Vec<String>, E>>,
    E: StdError + Send + Sync + 'static,
{
    type Error = E;

    fn next_row(&mut self) -> Result<Option<Vec<String>>, E> {
        self.rows.next().transpose()
    }
}

/// Source over rows that cannot fail.
pub fn from_rows<I, R, F>(rows: I) -> IterSource<impl Iterator<Item = Result<Vec<String>, Infallible>>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: Into<String>,
{
    IterSource::new(rows.into_iter().map(|row| {
        let fields: Vec<String> = row.into_iter().map(Into::into).collect();
        Ok::<_, Infallible>(fields)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_yields_then_ends() {
        let mut source = from_rows([vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(source.next_row().unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(source.next_row().unwrap(), Some(vec!["1".to_string(), "2".to_string()]));
        assert_eq!(source.next_row().unwrap(), None);
        assert_eq!(source.next_row().unwrap(), None);
    }

    #[test]
    fn test_iter_source_passes_errors_through() {
        let rows: Vec<Result<Vec<String>, io::Error>> = vec![
            Ok(vec!["h".into()]),
            Err(io::Error::new(io::ErrorKind::InvalidData, "broken")),
        ];
        let mut source = IterSource::new(rows.into_iter());
        assert!(source.next_row().unwrap().is_some());
        assert_eq!(source.next_row().unwrap_err().to_string(), "broken");
    }

    fn csv_source(data: &'static str) -> CsvSource<&'static [u8]> {
        CsvSource::new(
            csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(data.as_bytes()),
        )
    }

    #[test]
    fn test_csv_reader_keeps_header_row() {
        let mut source = csv_source("foo,bar\n1,\"two, quoted\"\n");
        assert_eq!(source.next_row().unwrap(), Some(vec!["foo".into(), "bar".into()]));
        assert_eq!(
            source.next_row().unwrap(),
            Some(vec!["1".into(), "two, quoted".into()])
        );
        assert_eq!(source.next_row().unwrap(), None);
    }

    #[test]
    fn test_csv_reader_reports_ragged_rows() {
        let mut source = csv_source("a,b\n1,2,3\n");
        source.next_row().unwrap();
        let err = source.next_row().unwrap_err();
        assert!(matches!(err.kind(), csv::ErrorKind::UnequalLengths { .. }));
    }

    #[test]
    fn test_csv_source_rows_do_not_leak_between_reads() {
        let mut source: CsvSource<&[u8]> = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader("a,b,c\nx\n".as_bytes())
            .into();
        assert_eq!(source.next_row().unwrap().unwrap().len(), 3);
        assert_eq!(source.next_row().unwrap(), Some(vec!["x".to_string()]));
        assert_eq!(source.next_row().unwrap(), None);
    }

    #[test]
    fn test_mut_ref_is_a_source() {
        fn pull<S: RowSource>(mut source: S) -> Option<Vec<String>> {
            source.next_row().unwrap()
        }

        let mut source = from_rows([["x"]]);
        assert!(pull(&mut source).is_some());
        assert!(pull(&mut source).is_none());
    }
}
