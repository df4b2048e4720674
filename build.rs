fn main() {
    // Emits the ESP-IDF toolchain environment captured by embuild when
    // building for the device; on host builds there is nothing to emit.
    embuild::espidf::sysenv::output();
}
