//! 内建标量编解码器：整数、浮点、布尔与文本的固定文本形式。

use alloc::format;
use alloc::string::{String, ToString};
use core::num::IntErrorKind;

use crate::coder::{DecodeCoder, EncodeCoder};
use crate::error::{CodecError, codes};
use crate::key::TypeKey;
use crate::registry::Registry;

/// 判定 `key` 是否属于受认可的内建标量集合。
///
/// # 语义说明
/// - 该集合是静态事实，与注册状态无关：别名登记据此校验目标类型，
///   即使对应标量的函数对被调用方覆盖注册，集合本身不变。
pub(crate) fn is_builtin_scalar(key: TypeKey) -> bool {
    builtin_scalar_keys().contains(&key)
}

fn builtin_scalar_keys() -> [TypeKey; 14] {
    [
        TypeKey::of::<i8>(),
        TypeKey::of::<i16>(),
        TypeKey::of::<i32>(),
        TypeKey::of::<i64>(),
        TypeKey::of::<isize>(),
        TypeKey::of::<u8>(),
        TypeKey::of::<u16>(),
        TypeKey::of::<u32>(),
        TypeKey::of::<u64>(),
        TypeKey::of::<usize>(),
        TypeKey::of::<f32>(),
        TypeKey::of::<f64>(),
        TypeKey::of::<bool>(),
        TypeKey::of::<String>(),
    ]
}

/// 将全部内建标量编解码器注册进 `registry`。
///
/// # 行为逻辑（How）
/// - 整数：十进制最简形式编码；解码按目标宽度精确解析，溢出与畸形数字
///   分别映射为 `codec.value_out_of_range` 与 `codec.parse`；
/// - 浮点：`%.6f` 风味的定点六位小数编码；解码接受任意合法十进制/科学计数
///   文本，有限字面量越出目标宽度时报 `codec.value_out_of_range`；
/// - 布尔：编码小写 `true`/`false`；解码大小写不敏感地接受
///   {true, false, 1, 0, on, off, yes, no}，不剥离空白；
/// - 文本：双向恒等。
pub(crate) fn register_builtin_scalars(registry: &Registry) {
    register_integers(registry);
    register_floats(registry);
    register_bool(registry);
    register_text(registry);
}

fn integer_decode_error(text: &str, err: core::num::ParseIntError, width: &'static str) -> CodecError {
    // 溢出与畸形数字走不同错误码，便于上游区分“修输入”与“换宽度”两类处置。
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CodecError::new(
            codes::CODEC_VALUE_OUT_OF_RANGE,
            format!("integer literal `{text}` does not fit `{width}`"),
        )
        .with_cause(err),
        _ => CodecError::new(
            codes::CODEC_PARSE,
            format!("integer literal `{text}` is malformed"),
        )
        .with_cause(err),
    }
}

macro_rules! register_integer_coders {
    ($registry:expr, $($ty:ty),+ $(,)?) => {$(
        $registry.register::<$ty>(
            EncodeCoder::plain(|value: &$ty| Ok(value.to_string())),
            DecodeCoder::plain(|text: &str, out: &mut $ty| {
                *out = text
                    .parse::<$ty>()
                    .map_err(|err| integer_decode_error(text, err, stringify!($ty)))?;
                Ok(())
            }),
        );
    )+};
}

fn register_integers(registry: &Registry) {
    register_integer_coders!(registry, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
}

/// 判定文本是否为显式的无穷字面量（允许正负号前缀，大小写不敏感）。
fn is_infinity_literal(text: &str) -> bool {
    let magnitude = text.strip_prefix(['+', '-']).unwrap_or(text);
    magnitude.eq_ignore_ascii_case("inf") || magnitude.eq_ignore_ascii_case("infinity")
}

macro_rules! register_float_coders {
    ($registry:expr, $($ty:ty),+ $(,)?) => {$(
        $registry.register::<$ty>(
            EncodeCoder::plain(|value: &$ty| Ok(format!("{value:.6}"))),
            DecodeCoder::plain(|text: &str, out: &mut $ty| {
                let parsed = text.parse::<$ty>().map_err(|err| {
                    CodecError::new(
                        codes::CODEC_PARSE,
                        format!("float literal `{text}` is malformed"),
                    )
                    .with_cause(err)
                })?;
                // 宿主解析将越宽的有限字面量饱和为无穷；对调用方而言这仍是“值越界”。
                if parsed.is_infinite() && !is_infinity_literal(text) {
                    return Err(CodecError::new(
                        codes::CODEC_VALUE_OUT_OF_RANGE,
                        format!("float literal `{text}` does not fit `{}`", stringify!($ty)),
                    ));
                }
                *out = parsed;
                Ok(())
            }),
        );
    )+};
}

fn register_floats(registry: &Registry) {
    register_float_coders!(registry, f32, f64);
}

fn register_bool(registry: &Registry) {
    registry.register::<bool>(
        EncodeCoder::plain(|value: &bool| Ok(String::from(if *value { "true" } else { "false" }))),
        DecodeCoder::plain(|text: &str, out: &mut bool| {
            // 大小写不敏感，但不剥离空白：` TRUE ` 属于非法输入。
            *out = match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => true,
                "false" | "0" | "off" | "no" => false,
                _ => {
                    return Err(CodecError::new(
                        codes::CODEC_UNSUPPORTED_VALUE,
                        format!("boolean literal `{text}` is not supported"),
                    ));
                }
            };
            Ok(())
        }),
    );
}

fn register_text(registry: &Registry) {
    registry.register::<String>(
        EncodeCoder::plain(|value: &String| Ok(value.clone())),
        DecodeCoder::plain(|text: &str, out: &mut String| {
            out.clear();
            out.push_str(text);
            Ok(())
        }),
    );
}
