use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tabula_codec::{Context, TypeKey, default_registry, marshal, unmarshal};

/// 顶层标量编码基准：覆盖整数与浮点两条最常走的路径。
///
/// # 设计目的（Why）
/// - 编码入口位于模式推断与代码生成的热路径，需持续观测单次调用开销；
/// - 整数与浮点分别代表“纯 `to_string`”与“定点格式化”两种成本画像。
///
/// # 执行逻辑（How）
/// - 经由进程级默认注册中心调用顶层 `marshal`，包含一次查找与一次 trampoline 调用。
fn bench_scalar_marshal(c: &mut Criterion) {
    c.bench_function("marshal_i64", |b| {
        b.iter(|| marshal(black_box(&-7_620_412i64)).unwrap())
    });
    c.bench_function("marshal_f64", |b| {
        b.iter(|| marshal(black_box(&1609.344f64)).unwrap())
    });
}

/// 顶层标量解码基准：科学计数浮点文本代表解析端的常见负载。
fn bench_scalar_unmarshal(c: &mut Criterion) {
    c.bench_function("unmarshal_f64", |b| {
        b.iter(|| {
            let mut out = 0.0f64;
            unmarshal(black_box("2.5e3"), &mut out).unwrap();
            out
        })
    });
}

/// 注册中心解析与包装器直调基准，用于区分“查找成本”与“编码成本”。
///
/// # 契约说明（What）
/// - `encoder_lookup` 度量读锁下的显式表命中；
/// - `encode_text_reused` 复用已解析的包装器与上下文，度量纯 trampoline 调用。
fn bench_registry_resolution(c: &mut Criterion) {
    let registry = default_registry();
    c.bench_function("encoder_lookup", |b| {
        b.iter(|| registry.encoder(black_box(TypeKey::of::<i64>())).is_some())
    });

    let encoder = registry
        .encoder(TypeKey::of::<i64>())
        .expect("builtin scalar");
    let ctx = Context::new();
    c.bench_function("encode_text_reused", |b| {
        b.iter(|| encoder.encode_text(&ctx, black_box(&-7_620_412i64)).unwrap())
    });
}

criterion_group!(
    codec_benches,
    bench_scalar_marshal,
    bench_scalar_unmarshal,
    bench_registry_resolution
);
criterion_main!(codec_benches);
