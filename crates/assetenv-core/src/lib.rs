pub mod detect;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod hosts;
pub mod html;
pub mod io;
pub mod preference;
pub mod resolve;
pub mod retarget;
pub mod types;

pub use error::{AssetEnvError, Result};
