pub mod cookie;
pub mod gate;
pub mod password;
pub mod token;

pub use gate::{authenticate, require_auth};
pub use token::{AuthUser, InvalidToken, TokenCodec};
