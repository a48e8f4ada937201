use anyhow::Result;
use clap::Parser;

use palsort::cli::Args;
use palsort::color::Color;
use palsort::gpl::{self, PaletteFile};
use palsort::preview;
use palsort::registry::{CommandTable, PALETTE_SORT};
use palsort::sorter::SortRequest;
use palsort::store::{InMemoryStore, StaticContext};

fn main() -> Result<()> {
    let args = Args::parse();

    let file = gpl::load(&args.palette)?;
    let name = file.name.clone();
    let columns = file.columns;

    let mut store = InMemoryStore::new();
    let handle = store.insert(file.entries, true);
    let ctx = StaticContext {
        foreground: Color::from_hex(&args.fg)?,
        background: Color::from_hex(&args.bg)?,
    };

    let request = SortRequest {
        mode: args.mode,
        slice: args.slice.clone(),
        channel: args.channel,
        quantize: args.quantize,
        ascending: args.ascending,
        partition_channel: args.partition_channel,
        partition_quantize: args.partition_quantize,
    };

    let table = CommandTable::with_builtins();
    let sorted = table.dispatch(PALETTE_SORT, &mut store, &ctx, handle, &request)?;

    let result = PaletteFile {
        name,
        columns,
        entries: store.entries(sorted)?.to_vec(),
    };

    if args.preview {
        preview::print_swatches(&result.entries, result.columns);
    }
    if args.in_place {
        gpl::save(&args.palette, &result)?;
    } else if let Some(path) = &args.output {
        gpl::save(path, &result)?;
    } else if !args.preview {
        print!("{}", gpl::serialize(&result));
    }

    Ok(())
}
