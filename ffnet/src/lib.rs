pub mod activation;
pub mod dataset;
pub mod error;
pub mod loss;
pub mod net;
pub mod scoring;
pub mod tensor;
pub mod util;

pub use error::{Error, Result};

extern crate base64;
extern crate rand;
extern crate rand_distr;
extern crate serde;
extern crate serde_json;
