// build.rs

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Only the serdisp driver links against a C library. The headless driver
    // and everything else is pure Rust.
    if std::env::var_os("CARGO_FEATURE_SERDISP").is_none() {
        return;
    }

    // pkg-config first, since distributions ship serdisplib.pc alongside the
    // headers. It prints the link flags itself on success.
    match pkg_config::probe_library("serdisplib") {
        Ok(_) => {
            eprintln!("pkg-config found serdisplib. Linking configured automatically.");
        }
        Err(e) => {
            eprintln!(
                "pkg-config failed for serdisplib ({}). Falling back to manual linking.",
                e
            );
            println!("cargo:rustc-link-lib=serdisp");
            println!("cargo:rustc-link-search=/usr/lib");
            println!("cargo:rustc-link-search=/usr/local/lib");
        }
    }
}
