use super::print_mappings;
use colored::Colorize;
use portflow_core::decode_ports_label;

/// `decode` コマンド
pub fn handle_decode(value: &str) -> anyhow::Result<()> {
    let mappings = decode_ports_label(value)?;
    if mappings.is_empty() {
        eprintln!("{}", "公開されているポートはありません".yellow());
        return Ok(());
    }
    print_mappings(&mappings);
    Ok(())
}
