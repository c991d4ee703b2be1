use criterion::{criterion_group, criterion_main, Criterion};
use zerkel::enumerate::Enumerator;
use zerkel::eval::{Argument, Interpreter};
use zerkel::parser;
use zerkel::set::Set;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse map macro", |b| {
        b.iter(|| {
            let node = parser::parse("map o+II").expect("parses");
            assert_eq!(node.arity(), 1);
        })
    });

    c.bench_function("interpret recursive union", |b| {
        let node = parser::parse("oRo?<>I>>I<>I<<III").expect("parses");
        let arg = Set::parse("{{{}}, {{{}}}}").expect("parses");
        b.iter(|| {
            let mut interpreter = Interpreter::new(node.clone());
            interpreter
                .interpret(&[Argument::Set(arg.clone())])
                .expect("interpret")
        })
    });

    c.bench_function("enumerate size 8 arity 1", |b| {
        b.iter(|| {
            let enumerator = Enumerator::new(false);
            enumerator.generate(8, 1)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
