mod traits;
mod cortex;

pub use traits::*;
pub use cortex::CortexCompletionClient;
