fn main() {
    println!("cargo:rerun-if-env-changed=SYNAPSYS_PIPELINE_CONFIG");

    // Host builds (tests, fuzzing) have no ESP-IDF toolchain to locate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
