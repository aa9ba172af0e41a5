mod export;
mod model_envelope;
mod session;
mod task;
mod turn;

pub use export::*;
pub use model_envelope::*;
pub use session::*;
pub use task::*;
pub use turn::*;
