//! Typed record reader.
//!
//! A [`Reader`] validates its record type once, when it is built. The first
//! [`read`](Reader::read) consumes the header row and binds it to the
//! record's fields; that call and every later one then fill the target with
//! the next data row.
//!
//! ```rust,ignore
//! use csvtag::{CsvRecord, Reader};
//!
//! #[derive(Debug, Default, CsvRecord)]
//! struct Row {
//!     #[csv("foo")]
//!     foo: String,
//!     #[csv("bar")]
//!     bar: String,
//! }
//!
//! let mut reader = Reader::<Row, _>::from_reader("foo,bar\n1,2\n".as_bytes())?;
//! for row in reader.records() {
//!     println!("{:?}", row?);
//! }
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use crate::assign::assign_row;
use crate::bind::{bind_header, ColumnMap};
use crate::config::SourceOptions;
use crate::descriptor::Record;
use crate::error::{ReadError, ReadResult, Result, ValidationResult};
use crate::input::{open_path_auto, InputInfo, TextSource};
use crate::source::{CsvSource, RowSource};
use crate::validate::{validate_record, RecordLayout};

/// Reads rows from a [`RowSource`] into records of type `T`.
///
/// Not meant to be shared between threads without a lock; `read` needs
/// `&mut self`.
pub struct Reader<T, S> {
    source: S,
    layout: RecordLayout<T>,
    /// `None` until the header row is bound.
    columns: Option<ColumnMap>,
}

impl<T: Record, S: RowSource> Reader<T, S> {
    /// Validate `T` and wrap `source`. No row is read.
    pub fn new(source: S) -> ValidationResult<Self> {
        let layout = validate_record::<T>()?;
        tracing::debug!(
            record = layout.type_name(),
            fields = layout.len(),
            "validated record type"
        );
        Ok(Self {
            source,
            layout,
            columns: None,
        })
    }
}

impl<T, S: RowSource> Reader<T, S> {
    /// Read the next data row into `target`.
    ///
    /// Returns [`ReadError::EndOfData`] once rows run out, including when the
    /// input is empty or holds only a header. Source errors are returned as
    /// they were reported; a failed header read leaves the header unbound.
    pub fn read(&mut self, target: &mut T) -> ReadResult<()> {
        let columns = match self.columns.take() {
            Some(columns) => columns,
            None => {
                let header = self.pull()?;
                self.bind(&header)
            }
        };

        let result = self.pull().and_then(|row| {
            tracing::trace!(columns = row.len(), "assigning row");
            Ok(assign_row(row, target, &columns, &self.layout)?)
        });
        self.columns = Some(columns);
        result
    }

    /// Iterate over the remaining records, one fresh `T` per row.
    pub fn records(&mut self) -> Records<'_, T, S>
    where
        T: Default,
    {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Column map, once the header has been read.
    pub fn column_map(&self) -> Option<&ColumnMap> {
        self.columns.as_ref()
    }

    pub fn header_bound(&self) -> bool {
        self.columns.is_some()
    }

    pub fn layout(&self) -> &RecordLayout<T> {
        &self.layout
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Reading from the source directly shifts which row is taken as header
    /// or data.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn pull(&mut self) -> ReadResult<Vec<String>> {
        match self.source.next_row() {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(ReadError::EndOfData),
            Err(err) => Err(ReadError::from_source(err)),
        }
    }

    fn bind(&self, header: &[String]) -> ColumnMap {
        let columns = bind_header(header, self.layout.annotations());
        for (position, field) in self.layout.fields().iter().enumerate() {
            if let Some(name) = field.annotation.column() {
                if !columns.binds_field(position) {
                    tracing::debug!(field = field.name, column = name, "field not bound by header");
                }
            }
        }
        tracing::debug!(
            record = self.layout.type_name(),
            header_columns = header.len(),
            bound = columns.len(),
            "bound header"
        );
        columns
    }
}

impl<T: Record, R: io::Read> Reader<T, CsvSource<R>> {
    /// Read CSV from `rdr` with default options.
    pub fn from_reader(rdr: R) -> ValidationResult<Self> {
        Self::with_options(rdr, &SourceOptions::default())
    }

    pub fn with_options(rdr: R, options: &SourceOptions) -> ValidationResult<Self> {
        Self::new(CsvSource::new(options.builder().from_reader(rdr)))
    }
}

impl<T: Record> Reader<T, CsvSource<File>> {
    /// Open a UTF-8 CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &SourceOptions) -> Result<Self> {
        let source = options.builder().from_path(path)?;
        Ok(Self::new(CsvSource::new(source))?)
    }
}

impl<T: Record> Reader<T, TextSource> {
    /// Open a file of any common encoding, sniffing the delimiter unless
    /// `delimiter` is given.
    pub fn from_path_auto<P: AsRef<Path>>(
        path: P,
        delimiter: Option<u8>,
        options: &SourceOptions,
    ) -> Result<(Self, InputInfo)> {
        let (source, info) = open_path_auto(path, delimiter, options)?;
        Ok((Self::new(source)?, info))
    }
}

/// Iterator returned by [`Reader::records`].
///
/// Ends at end of data. After yielding an error it ends as well.
pub struct Records<'r, T, S> {
    reader: &'r mut Reader<T, S>,
    done: bool,
}

impl<T: Default, S: RowSource> Iterator for Records<'_, T, S> {
    type Item = ReadResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut record = T::default();
        match self.reader.read(&mut record) {
            Ok(()) => Some(Ok(record)),
            Err(ReadError::EndOfData) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, Kind, TypeDescriptor};
    use crate::error::ValidationError;
    use crate::source::{from_rows, IterSource};

    #[derive(Debug, Default, PartialEq)]
    struct Example {
        bar: String,
        baz: String,
        foo: String,
    }

    impl Record for Example {
        fn descriptor() -> TypeDescriptor<Self> {
            TypeDescriptor::handle_to_struct(
                "Example",
                vec![
                    FieldDescriptor::text("bar", "bar", |r: &mut Self, v| r.bar = v),
                    FieldDescriptor::text("baz", "baz", |r: &mut Self, v| r.baz = v),
                    FieldDescriptor::text("foo", "foo", |r: &mut Self, v| r.foo = v),
                ],
            )
        }
    }

    #[allow(dead_code)]
    #[derive(Debug, Default)]
    struct Counted {
        count: i64,
    }

    impl Record for Counted {
        fn descriptor() -> TypeDescriptor<Self> {
            TypeDescriptor::handle_to_struct(
                "Counted",
                vec![FieldDescriptor::untyped("count", Kind::Integer, "count")],
            )
        }
    }

    fn example(foo: &str, bar: &str, baz: &str) -> Example {
        Example {
            foo: foo.into(),
            bar: bar.into(),
            baz: baz.into(),
        }
    }

    const EXAMPLE_CSV: &str = "foo,bar,baz\n1,2,hello\n3,2,world\n";

    #[test]
    fn test_read_until_end_of_data() {
        let mut reader = Reader::<Example, _>::new(from_rows([
            ["foo", "bar", "baz"],
            ["1", "2", "hello"],
            ["3", "2", "world"],
        ]))
        .unwrap();

        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record, example("1", "2", "hello"));

        let mut record2 = Example::default();
        reader.read(&mut record2).unwrap();
        assert_eq!(record2, example("3", "2", "world"));

        let mut record3 = Example::default();
        assert!(reader.read(&mut record3).unwrap_err().is_end_of_data());
    }

    #[test]
    fn test_invalid_type_fails_before_reading() {
        let mut source = from_rows([["count"], ["1"]]);
        let err = Reader::<Counted, _>::new(&mut source).err().unwrap();
        assert!(matches!(err, ValidationError::FieldNotAssignable { field: "count", .. }));
        assert!(source.next_row().unwrap().is_some());
    }

    #[test]
    fn test_empty_source() {
        let rows: Vec<Vec<String>> = Vec::new();
        let mut reader = Reader::<Example, _>::new(from_rows(rows)).unwrap();
        let err = reader.read(&mut Example::default()).unwrap_err();
        assert!(err.is_end_of_data());
        assert!(!reader.header_bound());
    }

    #[test]
    fn test_header_only() {
        let mut reader = Reader::<Example, _>::from_reader("foo,bar,baz\n".as_bytes()).unwrap();
        let err = reader.read(&mut Example::default()).unwrap_err();
        assert!(err.is_end_of_data());
        assert!(reader.header_bound());
    }

    #[test]
    fn test_header_is_bound_once() {
        let mut reader = Reader::<Example, _>::from_reader(EXAMPLE_CSV.as_bytes()).unwrap();
        assert!(reader.column_map().is_none());

        reader.read(&mut Example::default()).unwrap();
        let expected: ColumnMap = [(0, 2), (1, 0), (2, 1)].into_iter().collect();
        assert_eq!(reader.column_map(), Some(&expected));

        // a second read must treat "3,2,world" as data, not as a header
        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record, example("3", "2", "world"));
        assert_eq!(reader.column_map(), Some(&expected));
    }

    #[test]
    fn test_missing_column_keeps_default() {
        let mut reader = Reader::<Example, _>::from_reader("foo,other\nx,y\n".as_bytes()).unwrap();
        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record, example("x", "", ""));
    }

    #[test]
    fn test_source_error_is_propagated() {
        let rows: Vec<std::result::Result<Vec<String>, io::Error>> = vec![
            Ok(vec!["foo".into()]),
            Err(io::Error::new(io::ErrorKind::InvalidData, "record 2: bad quote")),
            Ok(vec!["later".into()]),
        ];
        let mut reader = Reader::<Example, _>::new(IterSource::new(rows.into_iter())).unwrap();
        let err = reader.read(&mut Example::default()).unwrap_err();
        assert_eq!(err.to_string(), "record 2: bad quote");
        assert!(err.downcast_source::<io::Error>().is_some());

        // no retry logic: the next call just pulls the next row
        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record.foo, "later");
    }

    #[test]
    fn test_header_error_leaves_header_pending() {
        let rows: Vec<std::result::Result<Vec<String>, io::Error>> = vec![
            Err(io::Error::new(io::ErrorKind::Other, "unreadable")),
            Ok(vec!["bar".into()]),
            Ok(vec!["b".into()]),
        ];
        let mut reader = Reader::<Example, _>::new(IterSource::new(rows.into_iter())).unwrap();
        assert!(reader.read(&mut Example::default()).is_err());
        assert!(!reader.header_bound());

        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record.bar, "b");
    }

    #[test]
    fn test_data_error_keeps_header_bound() {
        let rows: Vec<std::result::Result<Vec<String>, io::Error>> = vec![
            Ok(vec!["baz".into(), "foo".into()]),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad row")),
            Ok(vec!["z".into(), "f".into()]),
        ];
        let mut reader = Reader::<Example, _>::new(IterSource::new(rows.into_iter())).unwrap();
        assert!(reader.read(&mut Example::default()).is_err());
        assert!(reader.header_bound());

        let mut record = Example::default();
        reader.read(&mut record).unwrap();
        assert_eq!(record, example("f", "", "z"));
    }

    #[test]
    fn test_ragged_row_from_csv() {
        let mut reader =
            Reader::<Example, _>::from_reader("foo,bar,baz\n1,2\n".as_bytes()).unwrap();
        let err = reader.read(&mut Example::default()).unwrap_err();
        let csv_err = err.downcast_source::<csv::Error>().unwrap();
        assert!(matches!(csv_err.kind(), csv::ErrorKind::UnequalLengths { .. }));
    }

    #[test]
    fn test_records_iterator() {
        let mut reader = Reader::<Example, _>::from_reader(EXAMPLE_CSV.as_bytes()).unwrap();
        let records: Vec<Example> = reader.records().collect::<ReadResult<_>>().unwrap();
        assert_eq!(records, vec![example("1", "2", "hello"), example("3", "2", "world")]);
        assert!(reader.records().next().is_none());
    }

    #[test]
    fn test_records_stop_after_error() {
        let options = SourceOptions::default();
        let mut reader =
            Reader::<Example, _>::with_options("foo\n1\n2,3\n4\n".as_bytes(), &options).unwrap();
        let mut records = reader.records();
        assert_eq!(records.next().unwrap().unwrap().foo, "1");
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
    }

    #[test]
    fn test_into_inner_returns_source() {
        let mut reader = Reader::<Example, _>::new(from_rows([["foo"], ["1"], ["2"]])).unwrap();
        reader.read(&mut Example::default()).unwrap();
        let mut source = reader.into_inner();
        assert_eq!(source.next_row().unwrap(), Some(vec!["2".to_string()]));
    }
}
