/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  netflix_titles.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (column kinds inferred once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  equality predicates → View (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ aggregate / stats  │  value counts, standing reports, describe()
///   └────────────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
