//! The pest grammar for one CASL II source line; see `casl2.pest`.

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "casl2.pest"]
pub struct Casl2Parser;
