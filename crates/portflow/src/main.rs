mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portflow")]
#[command(about = "コンテナのポート公開指定 (-p / --publish) をパース・検証するツール", long_about = None)]
struct Cli {
    /// 設定ファイルのパス（省略時は自動探索）
    #[arg(long, global = true, env = "PORTFLOW_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// ホストポート自動割り当てで展開できる最大ポート数
    #[arg(long, global = true, env = "PORTFLOW_MAX_AUTO_RANGE")]
    max_auto_range: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ポート指定をパースしてマッピングを表示
    Parse {
        /// ポート指定（例: 127.0.0.1:3000-3001:8080-8081/tcp）
        #[arg(required = true)]
        specs: Vec<String>,
        /// ラベル形式(JSON)で出力
        #[arg(long)]
        json: bool,
        /// 自動割り当てのホストポートを確定させず 0 のまま表示
        #[arg(long)]
        raw: bool,
    },
    /// ポート指定をパースしてラベル値を出力
    Encode {
        #[arg(required = true)]
        specs: Vec<String>,
    },
    /// ラベル値をデコードしてマッピングを表示
    Decode {
        /// ラベル値（JSON配列）
        value: String,
    },
    /// バージョン情報を表示
    Version,
}

fn main() -> anyhow::Result<()> {
    // stdout は出力用に空けておき、ログは stderr へ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        println!("portflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = commands::load_config(cli.config.as_deref(), cli.max_auto_range)?;

    match cli.command {
        Commands::Parse { specs, json, raw } => commands::handle_parse(&config, &specs, json, raw),
        Commands::Encode { specs } => commands::handle_encode(&config, &specs),
        Commands::Decode { value } => commands::handle_decode(&value),
        Commands::Version => Ok(()),
    }
}
