fn main() {
    avromark::cli::run();
}
