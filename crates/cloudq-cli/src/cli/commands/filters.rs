//! `cloudq filters` – list registered filter names.

use cloudq_core::filters;

pub fn run_filters() {
    for name in filters::names() {
        println!("{name}");
    }
}
