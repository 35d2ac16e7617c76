use serde::{
    self,
    de::{self, SeqAccess, Visitor},
    Deserialize,
};

const FIELDS: &[&str] = &["file", "start", "stop", "description"];

/// One data row of the clip table, fields taken by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub file: String,
    pub start: String,
    pub stop: String,
    pub description: String,
}

impl Row {
    pub fn has_file(&self) -> bool {
        !self.file.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        struct RowVisitor;
        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a row of exactly 4 fields: file, start, stop, description")
            }

            fn visit_seq<V>(self, mut seq: V) -> Result<Row, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let mut next = |i: usize| -> Result<String, V::Error> {
                    seq.next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))
                };
                let file = next(0)?;
                let start = next(1)?;
                let stop = next(2)?;
                let description = next(3)?;

                let mut extra = 0;
                while seq.next_element::<de::IgnoredAny>()?.is_some() {
                    extra += 1;
                }
                if extra > 0 {
                    return Err(de::Error::invalid_length(FIELDS.len() + extra, &self));
                }

                Ok(Row {
                    file,
                    start,
                    stop,
                    description,
                })
            }
        }

        deserializer.deserialize_struct("row", FIELDS, RowVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use csv::StringRecord;

    fn row_from(fields: &[&str]) -> Result<Row, csv::Error> {
        StringRecord::from(fields.to_vec()).deserialize(None)
    }

    #[test]
    fn positional_fields() {
        let row = row_from(&["clip.mp4", "00:10", "01:05", "intro"]).unwrap();
        assert_eq!(
            row,
            Row {
                file: "clip.mp4".into(),
                start: "00:10".into(),
                stop: "01:05".into(),
                description: "intro".into(),
            }
        );
        assert!(row.has_file());
    }

    #[test]
    fn blank_file() {
        assert!(!row_from(&["", "00:10", "01:05", ""]).unwrap().has_file());
        assert!(!row_from(&["   ", "00:10", "01:05", ""]).unwrap().has_file());
    }

    #[test]
    fn wrong_field_count() {
        assert!(row_from(&["clip.mp4", "00:10", "01:05"]).is_err());
        assert!(row_from(&["clip.mp4"]).is_err());
        assert!(row_from(&["clip.mp4", "00:10", "01:05", "intro", "extra"]).is_err());
    }
}
