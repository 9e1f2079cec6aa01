use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skv-compare")]
#[command(about = "SKV規格と入札資料の比較ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 比較プロキシサーバを起動
    Serve {
        /// 待ち受けアドレス（デフォルト: 設定ファイルの値）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// 2つのExcelを比較して結果を保存
    Compare {
        /// SKV規格ファイル (.xlsx/.xls)
        #[arg(required = true)]
        skv: PathBuf,

        /// 入札資料ファイル (.xlsx/.xls)
        #[arg(required = true)]
        tender: PathBuf,

        /// 出力ファイル（デフォルト: SKV_Tender_Comparison_Result.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 比較APIのURL
        #[arg(long)]
        url: Option<String>,

        /// 死活確認先のURL
        #[arg(long)]
        health_url: Option<String>,
    },

    /// 比較結果Excelを表示
    Preview {
        /// 比較結果ファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 絞り込み文字列（大文字小文字を区別しない）
        #[arg(short, long)]
        search: Option<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// バックエンドの死活確認
    Health {
        /// 確認先のURL
        #[arg(long)]
        url: Option<String>,
    },

    /// 設定を管理
    Config {
        /// 比較APIのURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
