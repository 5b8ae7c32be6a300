use anyhow::Error;

pub mod alphabets;
pub mod config;
pub mod io;
pub mod likelihood;
pub mod midedge;
pub mod phylo_info;
pub mod posterior;
pub mod rates;
pub mod substitution_models;
pub mod tree;

mod macros;

type Result<T> = std::result::Result<T, Error>;
