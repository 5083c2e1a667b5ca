use std::fmt::Display;
use itertools::Itertools;

/// `[a, b, c]`
pub fn list<I, D>(items: I) -> String
where I: IntoIterator<Item = D>, D: Display { 
    format!("[{}]", items.into_iter().join(", "))
}

/// Renders an `m x n` grid as bracketed rows with aligned columns:
/// 
/// ```text
/// [ 1/1  -1/2 ]
/// [ 0/1  3/1  ]
/// ```
pub fn grid<D, F>(rows: usize, cols: usize, entry: F) -> String
where D: Display, F: Fn(usize, usize) -> D {
    use prettytable::{Cell, Row, Table};
    use prettytable::format::FormatBuilder;

    let format = FormatBuilder::new()
        .left_border('[')
        .right_border(']')
        .column_separator(' ')
        .padding(1, 1)
        .build();

    let mut table = Table::new();
    table.set_format(format);

    for i in 0..rows { 
        let cells = (0..cols).map(|j| 
            Cell::new(entry(i, j).to_string().as_str())
        ).collect();
        table.add_row(Row::new(cells));
    }

    table.to_string()
}
