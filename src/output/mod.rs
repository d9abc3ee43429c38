use std::io::{self, Write};

pub mod config;
pub mod types;

use config::OutputConfig;
use types::Envelope;

pub struct Emitter {
    pretty: bool,
}

impl Emitter {
    pub fn from_config(cfg: OutputConfig) -> Self { Emitter { pretty: cfg.pretty } }

    pub fn write_to(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        if self.pretty { serde_json::to_writer_pretty(&mut *w, env).map_err(to_io)?; }
        else { serde_json::to_writer(&mut *w, env).map_err(to_io)?; }
        writeln!(w)
    }

    pub fn emit(&self, env: &Envelope) -> io::Result<()> {
        let mut out = io::stdout().lock();
        self.write_to(env, &mut out)?;
        out.flush()
    }
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::new(io::ErrorKind::Other, e) }
