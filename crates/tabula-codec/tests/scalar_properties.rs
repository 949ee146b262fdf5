//! 内建标量往返性质验证。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：对内建标量全域随机取材，验证“解码(编码(v)) = v”在整数、
//!   布尔、文本上精确成立，在浮点上以六位小数舍入为模成立；同时验证别名标量与
//!   底层标量在任意取值下行为等价；
//! - **设计手法 (How)**：Proptest 随机生成取值，对编码文本附加形式断言
//!   （十进制最简、无前导零），对浮点以“十进制舍入误差 + 目标宽度 ulp 裕量”
//!   构成的容差比较；
//! - **边界 (What)**：浮点取材限定在有限区间，`inf`/`NaN` 的解码语义由
//!   单元测试单独覆盖；容差公式只会放大到机器精度量级，不会掩盖真实回归。

use proptest::prelude::*;
use tabula_codec::{Registry, marshal, unmarshal};

/// 底层表示为 `f64` 的用户标量，用于别名等价性质。
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Speed(f64);

fn registry_with_speed_alias() -> Registry {
    let registry = Registry::with_builtin_scalars();
    registry
        .register_alias::<Speed, f64>(|speed| speed.0, Speed)
        .expect("f64 is a built-in scalar");
    registry
}

proptest! {
    #[test]
    fn i64_round_trip_is_exact(value in any::<i64>()) {
        let text = marshal(&value).unwrap();
        // 形式断言：十进制最简，无前导零。
        prop_assert!(text == "0" || !text.trim_start_matches('-').starts_with('0'));
        let mut decoded = 0i64;
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn i8_round_trip_is_exact(value in any::<i8>()) {
        let text = marshal(&value).unwrap();
        let mut decoded = 0i8;
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn u64_round_trip_is_exact(value in any::<u64>()) {
        let text = marshal(&value).unwrap();
        let mut decoded = 0u64;
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn usize_round_trip_is_exact(value in any::<usize>()) {
        let text = marshal(&value).unwrap();
        let mut decoded = 0usize;
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn bool_round_trip_is_exact(value in any::<bool>()) {
        let text = marshal(&value).unwrap();
        prop_assert!(text == "true" || text == "false");
        let mut decoded = !value;
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn string_round_trip_is_identity(value in any::<String>()) {
        let text = marshal(&value).unwrap();
        prop_assert_eq!(&text, &value);
        let mut decoded = String::new();
        unmarshal(&text, &mut decoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn f64_round_trip_modulo_six_digit_rounding(value in -1.0e12f64..1.0e12f64) {
        let text = marshal(&value).unwrap();
        let mut decoded = 0.0f64;
        unmarshal(&text, &mut decoded).unwrap();
        // 容差 = 六位小数舍入误差上界 + 目标宽度下的表示误差裕量。
        let tolerance = 1.0e-6 + value.abs() * f64::EPSILON * 4.0;
        prop_assert!((decoded - value).abs() <= tolerance,
            "value={value}, text={text}, decoded={decoded}");
    }

    #[test]
    fn f32_round_trip_modulo_six_digit_rounding(value in -1.0e6f32..1.0e6f32) {
        let text = marshal(&value).unwrap();
        let mut decoded = 0.0f32;
        unmarshal(&text, &mut decoded).unwrap();
        let tolerance = 1.0e-6f64 + f64::from(value.abs()) * f64::from(f32::EPSILON) * 4.0;
        prop_assert!(f64::from((decoded - value).abs()) <= tolerance,
            "value={value}, text={text}, decoded={decoded}");
    }

    #[test]
    fn alias_scalar_matches_base_scalar(value in -1.0e9f64..1.0e9f64) {
        // Why: 别名回退必须与直接使用底层标量逐字节一致（P3）。
        let registry = registry_with_speed_alias();
        let via_alias = registry.marshal(&Speed(value)).unwrap();
        let via_base = registry.marshal(&value).unwrap();
        prop_assert_eq!(&via_alias, &via_base);

        let mut decoded_alias = Speed::default();
        let mut decoded_base = 0.0f64;
        registry.unmarshal(&via_alias, &mut decoded_alias).unwrap();
        registry.unmarshal(&via_base, &mut decoded_base).unwrap();
        prop_assert_eq!(decoded_alias.0, decoded_base);
    }
}
