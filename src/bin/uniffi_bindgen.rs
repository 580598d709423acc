//! UniFFI bindgen CLI tool for generating language bindings.
//!
//! This binary generates the Swift and Kotlin bindings used by the iOS and
//! Android apps from the food-guide-core library.
//!
//! ## Usage
//!
//! Generate Swift bindings:
//! ```bash
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libfood_guide_core.a --language swift --out-dir ./bindings/swift
//! ```
//!
//! Generate Kotlin bindings:
//! ```bash
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libfood_guide_core.so --language kotlin --out-dir ./bindings/kotlin
//! ```

fn main() {
    uniffi::uniffi_bindgen_main()
}
