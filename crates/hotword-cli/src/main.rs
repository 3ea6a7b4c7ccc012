fn main() {
    hotword_cli::run_main();
}
