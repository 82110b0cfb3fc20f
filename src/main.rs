fn main() -> loglens::error::AppResult<()> {
    loglens::entry::run()
}
