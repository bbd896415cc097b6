use crate::cli::commands::open_signed_in;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::resolve_output;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let (pool, user) = open_signed_in(cfg)?;
        let path = resolve_output(file);
        ExportLogic::export(
            &pool.conn,
            cfg,
            &user.id,
            *what,
            *format,
            &path.to_string_lossy(),
            range,
            *force,
        )?;
    }
    Ok(())
}
