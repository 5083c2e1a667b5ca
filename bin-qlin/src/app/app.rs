use std::io::{BufRead, BufReader, Write};
use std::panic::AssertUnwindSafe;
use log::{error, info};
use clap::Parser;
use super::session::{Reply, Session};
use super::utils::*;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Read commands from FILE instead of stdin.
    #[arg(short, long)]
    pub script: Option<String>,

    /// Do not print the prompt.
    #[arg(short, long)]
    pub quiet: bool,

    /// 0: off, 1: info, 2: debug, 3: trace.
    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub struct App {
    pub args: CliArgs
}

impl App { 
    pub fn new() -> Self { 
        let args = CliArgs::parse();
        Self::new_with(args)
    }

    pub fn new_with(args: CliArgs) -> Self { 
        App { args }
    }

    pub fn run(&self) -> Result<String, Box<dyn std::error::Error>> { 
        if self.args.log > 0 { 
            qlin::util::log::init_logger(self.args.log)?;
        }

        info!("args: {:?}", self.args);

        let (res, time) = measure(|| -> Result<usize, Box<dyn std::error::Error>> {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();

            match &self.args.script { 
                Some(path) => { 
                    let file = std::fs::File::open(path).map_err(|e| 
                        format!("cannot open '{path}': {e}")
                    )?;
                    self.run_with(BufReader::new(file), &mut out, false)
                },
                None => { 
                    let stdin = std::io::stdin();
                    self.run_with(stdin.lock(), &mut out, !self.args.quiet)
                }
            }
        });

        let count = res?;

        info!("commands: {count}, time: {:?}", time);

        Ok(String::new())
    }

    /// Runs each line of `input` as a command, writing replies and 
    /// error messages to `out`. Returns the number of commands run.
    pub fn run_with<R, W>(&self, input: R, out: &mut W, prompt: bool) -> Result<usize, Box<dyn std::error::Error>>
    where R: BufRead, W: Write { 
        let mut session = Session::new();
        let mut lines = input.lines();
        let mut count = 0;

        loop { 
            if prompt { 
                write!(out, "qlin> ")?;
                out.flush()?;
            }

            let Some(line) = lines.next() else { 
                break
            };
            let line = line?;

            let res = guard_panic(AssertUnwindSafe(|| 
                session.exec(&line)
            ));

            match res { 
                Ok(Reply::Empty) => continue,
                Ok(Reply::Text(text)) => writeln!(out, "{text}")?,
                Ok(Reply::Quit) => break,
                Err(e) => { 
                    error!("{e}");
                    writeln!(out, "error: {e}")?;
                }
            }

            count += 1;
        }

        Ok(count)
    }
}
