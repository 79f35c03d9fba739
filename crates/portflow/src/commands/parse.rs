use colored::Colorize;
use portflow_config::PortflowConfig;
use portflow_core::{PortMapping, PublishParser, SequentialAllocator, encode_ports_label};

fn parser(config: &PortflowConfig) -> anyhow::Result<PublishParser<SequentialAllocator>> {
    Ok(PublishParser::with_allocator(
        config.parse_options(),
        config.allocator()?,
    ))
}

/// `parse` コマンド
///
/// `raw` を指定しない限り、自動割り当てのホストポートは設定のプールから確定させる。
pub fn handle_parse(
    config: &PortflowConfig,
    specs: &[String],
    json: bool,
    raw: bool,
) -> anyhow::Result<()> {
    let mut parser = parser(config)?;
    let mappings = if raw {
        parser.parse_all_raw(specs)?
    } else {
        parser.parse_all(specs)?
    };

    if json {
        println!("{}", encode_ports_label(&mappings)?);
    } else {
        print_mappings(&mappings);
    }
    Ok(())
}

/// `encode` コマンド
///
/// ラベルには確定したホストポートだけを書き込む。
pub fn handle_encode(config: &PortflowConfig, specs: &[String]) -> anyhow::Result<()> {
    let mappings = parser(config)?.parse_all(specs)?;
    println!("{}", encode_ports_label(&mappings)?);
    Ok(())
}

/// `port` コマンドと同じ一覧形式で表示
pub fn print_mappings(mappings: &[PortMapping]) {
    for mapping in mappings {
        if mapping.is_auto_host_port() {
            println!("{} {}", mapping, "(auto)".dimmed());
        } else {
            println!("{}", mapping);
        }
    }
}
