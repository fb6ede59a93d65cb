mod apps;
mod calculator;
mod web;

pub use apps::{launch_result as app_launch_result, AppProvider};
pub use calculator::{evaluate, format_number, CalcError, CalculatorProvider};
pub use web::{extract_terms, WebSearchProvider};
