#![no_main]
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use urlpattern_parser::{parse_constructor_string, tokenize, TokenizePolicy};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    pattern: String,
}

fuzz_target!(|input: FuzzInput| {
    // Lenient tokenizing must never fail, and every parse must either
    // produce an init or a structured error without panicking.
    tokenize(&input.pattern, TokenizePolicy::Lenient).unwrap();
    let _ = tokenize(&input.pattern, TokenizePolicy::Strict);
    let _ = parse_constructor_string(&input.pattern);
});
