//! `cloudq classify` – show how the retry classifier treats response codes.

use cloudq_core::retry::is_retryable_code;

pub fn run_classify(codes: &[String]) {
    for code in codes {
        let verdict = if is_retryable_code(code) { "retry" } else { "fail" };
        println!("{:<40} {}", code, verdict);
    }
}
