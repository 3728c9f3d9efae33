pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => println!("Loaded {}", path.display()),
        Err(dotenv::Error::Io(_)) => (),
        Err(e) => eprintln!("Could not parse .env: {e}"),
    }
}
