fn main() {
    // Forward the ESP-IDF build environment (MCU cfg flags, linker args)
    // when building the device image. Host builds have nothing to emit.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
