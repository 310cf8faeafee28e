//! CSV rendering of the value log.
//!
//! ```text
//! Timestamp,<service 1>,<service 2>,...
//! ,<characteristic 1>,<characteristic 2>,...
//! ,<unit 1>,<unit 2>,...
//! <timestamp>,<value 1>,<value 2>,...
//! ```
//!
//! Columns follow registry order. A characteristic missing from a row renders
//! as an empty field. Fields are written verbatim, without quoting.

use crate::datalog::{LogRow, Timestamp};
use crate::registry::SnapshotEntry;

/// Render the log header for `columns` followed by one line per row.
pub fn render_csv<'a>(
    columns: &[SnapshotEntry],
    rows: impl IntoIterator<Item = (&'a Timestamp, &'a LogRow)>,
) -> String {
    let mut csv = String::new();

    csv.push_str("Timestamp");
    push_fields(&mut csv, columns.iter().map(|c| c.service_name.as_str()));
    push_fields(&mut csv, columns.iter().map(|c| c.name.as_str()));
    push_fields(&mut csv, columns.iter().map(|c| c.unit));

    for (timestamp, row) in rows {
        csv.push_str(timestamp.as_str());
        push_fields(
            &mut csv,
            columns
                .iter()
                .map(|c| row.get(&c.id).map(String::as_str).unwrap_or("")),
        );
    }

    csv
}

/// Append `,field` for each field, then end the line.
fn push_fields<'a>(csv: &mut String, fields: impl Iterator<Item = &'a str>) {
    for field in fields {
        csv.push(',');
        csv.push_str(field);
    }
    csv.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CharacteristicId;

    fn column(id: &str, service: &str, name: &str, unit: &'static str) -> SnapshotEntry {
        SnapshotEntry {
            id: CharacteristicId::new(id),
            service_name: service.to_string(),
            name: name.to_string(),
            unit,
            last_value: String::new(),
        }
    }

    fn timestamp(s: &str) -> Timestamp {
        let datetime = chrono::NaiveDateTime::parse_from_str(s, crate::datalog::TIMESTAMP_FORMAT)
            .unwrap();
        Timestamp::from_datetime(&datetime)
    }

    #[test]
    fn test_header_only() {
        let columns = vec![
            column("a", "Battery", "Level", "%"),
            column("b", "Motion", "Heading", "°"),
        ];
        let csv = render_csv(&columns, std::iter::empty());
        assert_eq!(csv, "Timestamp,Battery,Motion\n,Level,Heading\n,%,°\n");
    }

    #[test]
    fn test_no_columns() {
        let t = timestamp("2024/05/06 07:08:09");
        let row = LogRow::new();
        let csv = render_csv(&[], vec![(&t, &row)]);
        assert_eq!(csv, "Timestamp\n\n\n2024/05/06 07:08:09\n");
    }

    #[test]
    fn test_rows_follow_column_order_and_blank_missing() {
        let columns = vec![
            column("a", "S", "A", ""),
            column("b", "S", "B", ""),
            column("c", "S", "C", ""),
        ];
        let t1 = timestamp("2024/05/06 07:08:09");
        let t2 = timestamp("2024/05/06 07:08:10");
        let row1: LogRow = [("c", "3"), ("a", "1")]
            .into_iter()
            .map(|(id, v)| (CharacteristicId::new(id), v.to_string()))
            .collect();
        let row2: LogRow = [("b", "true")]
            .into_iter()
            .map(|(id, v)| (CharacteristicId::new(id), v.to_string()))
            .collect();

        let csv = render_csv(&columns, vec![(&t1, &row1), (&t2, &row2)]);
        assert_eq!(
            csv,
            "Timestamp,S,S,S\n,A,B,C\n,,,\n2024/05/06 07:08:09,1,,3\n2024/05/06 07:08:10,,true,\n"
        );
    }
}
