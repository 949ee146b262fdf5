//! 常用导出集合：`use tabula_codec::prelude::*;` 即可获得注册与编解码的完整入口。

pub use crate::coder::{CoderFlavor, CoderPair, DecodeCoder, EncodeCoder};
pub use crate::context::Context;
pub use crate::error::{CodecError, ErrorCause, codes};
pub use crate::key::TypeKey;
pub use crate::marshal::{default_registry, marshal, unmarshal};
pub use crate::registry::{Registry, TextDecoder, TextEncoder};
pub use crate::value::DynValue;
