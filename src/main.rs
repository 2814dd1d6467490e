mod entry;
mod logger;
mod shutdown_handlers;

use pipeload::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
