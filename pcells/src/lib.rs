//! Parametric layout cells.
//!
//! The generators turn technology parameters and device parameters into
//! geometry:
//!
//! ```
//! use pcells::{DeviceParameters, Pdk};
//!
//! let pdk = Pdk::from_json_str(include_str!("../data/sample_tech.json"))?;
//! let params = DeviceParameters::from_json_str(
//!     r#"{"cell": "nmos", "width": "4u", "length": "0.13u", "ng": "1"}"#,
//! )?;
//! let nmos = pdk.generate(&params)?;
//! assert!(nmos.elements.pin("G").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Three cells are provided: [`nmos`](devices::nmos()), [`rsil`](devices::rsil())
//! and [`cmim`](devices::cmim()).

pub mod cache;
pub mod devices;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod options;
pub mod params;
pub mod pdk;
pub mod primitives;
pub mod quantity;
pub mod rules;
pub mod thermal;
pub mod tiler;


pub use devices::{generate, Cmim, Generation, Nmos, PCell, Rsil};
pub use error::{Error, Result};
pub use instance::{InstanceState, PCellInstance};
pub use options::GeneratorOptions;
pub use params::{CmimParams, DeviceParameters, NmosParams, RsilParams};
pub use pdk::Pdk;
pub use quantity::PhysicalQuantity;
pub use rules::DeviceRuleSet;
