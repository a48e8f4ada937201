use std::path::PathBuf;

use clap::Parser;

use crate::channel::ChannelSelector;
use crate::sorter::SortMode;

/// Sort the colors of a GIMP palette file by a chosen channel.
#[derive(Parser, Debug)]
#[command(name = "palsort", version, about)]
pub struct Args {
    /// Path to the input .gpl palette file
    pub palette: PathBuf,

    /// Which part of the palette to sort
    #[arg(short, long, value_enum, default_value = "all")]
    pub mode: SortMode,

    /// Slice expression `[START]:[NROWS][,[LENGTH]]` for the
    /// slice/autoslice/partitioned modes
    #[arg(short, long, default_value = "")]
    pub slice: String,

    /// Channel used as the sort key
    #[arg(short, long, value_enum, default_value = "luma")]
    pub channel: ChannelSelector,

    /// Quantization: values above 1 bucket the channel into roughly that
    /// many levels; 1 or less compares exact keys
    #[arg(short, long, default_value_t = 1.0)]
    pub quantize: f64,

    /// Sort ascending instead of descending
    #[arg(short, long)]
    pub ascending: bool,

    /// Channel that groups entries into partitions (partitioned mode)
    #[arg(long, value_enum, default_value = "luma")]
    pub partition_channel: ChannelSelector,

    /// Quantization for the partition channel (partitioned mode)
    #[arg(long, default_value_t = 1.0)]
    pub partition_quantize: f64,

    /// Foreground marker color for autoslice, e.g. `#000000`
    #[arg(long, default_value = "#000000")]
    pub fg: String,

    /// Background marker color for autoslice
    #[arg(long, default_value = "#ffffff")]
    pub bg: String,

    /// Write the sorted palette to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rewrite the input file in place
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,

    /// Print a colored terminal preview of the sorted palette
    #[arg(long)]
    pub preview: bool,
}
