#![no_main]
use fmtverb_core::{Arg, Field, sprintf};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary templates against a fixed mixed argument list. Malformed
    // directives must degrade to inline diagnostics, never panic.
    let template = String::from_utf8_lossy(data);

    let args = [
        Arg::from(-42i64),
        Arg::from(7u8),
        Arg::from(2.5f64),
        Arg::from("text"),
        Arg::from('☺'),
        Arg::from(true),
        Arg::Nil,
        Arg::slice("[]i32", vec![Arg::from(1), Arg::from(2)]),
        Arg::structure("P", vec![Field::new("X", 1)]),
        Arg::pointer("*P", 0xc0),
        Arg::map(
            "M",
            vec![
                (Arg::from("b"), Arg::from(1)),
                (Arg::from(3), Arg::from(2)),
                (Arg::slice("[]u8", vec![]), Arg::Nil),
                (Arg::from(-1i64), Arg::from("x")),
                (Arg::Nil, Arg::from(false)),
                (Arg::from(0.5f64), Arg::from(3)),
                (Arg::from("a"), Arg::from(4)),
                (Arg::from(9u8), Arg::from(5)),
            ],
        ),
    ];

    let out = sprintf(&template, &args);
    if !template.contains('%') {
        // Literal text, then the unused-argument report.
        assert!(out.starts_with(&*template));
        assert!(out.ends_with(')'));
    }
});
