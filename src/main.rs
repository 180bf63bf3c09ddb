fn main() -> Result<(), Box<dyn std::error::Error>> {
    cdaudio::runtime::run()
}
