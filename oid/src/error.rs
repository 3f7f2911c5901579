use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unknown industry '{0}', expected standard, tax or customs")]
    UnknownIndustry(String),
}
