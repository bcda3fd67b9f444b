use std::{
    io::{self, Write},
    sync::mpsc,
    thread,
};

use crate::App;

/// Token passed around the ring of workers.
enum Token {
    /// Start a new block at the offset.
    Block(usize),
    /// The previous block has been written, print yours.
    Flush,
}

struct Worker<'a> {
    app: &'a App<'a>,
    address: u64,
    data: &'a [u8],
    section_name: &'a str,
}

impl<'a> Worker<'a> {
    /// Finds the end of the block starting at `start` so that no instruction
    /// crosses it.
    fn block_len(&self, decoder: &ldasm::Decoder, start: usize) -> usize {
        let block_size = self.app.threads_block_size;
        let tail = &self.data[start..];
        let mut size = block_size;
        loop {
            if size > tail.len() {
                return tail.len();
            }
            let n = decoder.decode_len(&tail[..size]);
            if n != 0 {
                return n;
            }
            // the block starts with a run of zeroes longer than a block
            size = tail.iter().position(|i| *i != 0).unwrap_or(tail.len());
            debug!("{start:#x}: zero run of {size} bytes");
            size += block_size;
        }
    }

    fn run(
        &self,
        name: &str,
        rx: mpsc::Receiver<Token>,
        tx: mpsc::SyncSender<Token>,
    ) -> Result<(), io::Error> {
        let info = self.app.create_info();
        let mut printer = self
            .app
            .create_decoder(self.address)
            .printer(info, self.section_name);
        let mut buffer = Vec::with_capacity(8 * 1024);
        let mut block_address = 0;
        let mut block_len = 0;
        let mut printed = 0;
        let stdout = std::io::stdout();

        while let Ok(token) = rx.recv() {
            match token {
                Token::Block(start) => {
                    if start >= self.data.len() {
                        debug!("{name}: end of section");
                        return Ok(());
                    }

                    let skip = start as u64 - (printer.address() - self.address);
                    printer.skip(skip);
                    block_address = printer.address();
                    block_len = self.block_len(&printer, start);

                    if tx.send(Token::Block(start + block_len)).is_err() {
                        return Ok(());
                    }

                    debug!("{name}: {block_address:#x} decode {block_len} bytes");

                    buffer.clear();
                    let block = &self.data[start..start + block_len];
                    printer.print(&mut buffer, block, start == 0)?;
                    printed = (printer.address() - block_address) as usize;
                }
                Token::Flush => {
                    debug!("{name}: {block_address:#x} write {} bytes", buffer.len());

                    if let Err(err) = stdout.lock().write_all(&buffer) {
                        if err.kind() == io::ErrorKind::BrokenPipe {
                            break;
                        } else {
                            return Err(err);
                        }
                    }

                    if printed != block_len {
                        stdout.lock().flush()?;
                        let end = printer.address();
                        error!("{name}: {block_address:#x}:{end:#x} decoded {printed} bytes, expected {block_len} bytes");
                        return Ok(());
                    }

                    if tx.send(Token::Flush).is_err() {
                        return Ok(());
                    }
                }
            }
        }

        Ok(())
    }
}

pub fn disassemble_code(
    app: &App,
    address: u64,
    data: &[u8],
    section_name: &str,
) -> Result<(), io::Error> {
    let worker = Worker {
        app,
        address,
        data,
        section_name,
    };
    let threads = app.threads;

    debug!(
        "{section_name}: {threads} threads, ~{} bytes per block",
        app.threads_block_size
    );

    thread::scope(|s| {
        let mut senders = Vec::with_capacity(threads);
        let mut receivers = Vec::with_capacity(threads);

        for _ in 0..threads {
            let (tx, rx) = mpsc::sync_channel::<Token>(2);
            senders.push(tx);
            receivers.push(rx);
        }

        // each worker hands tokens to the next one, the first starts
        let first = senders.remove(0);
        if first.send(Token::Block(0)).is_err() || first.send(Token::Flush).is_err() {
            return;
        }
        senders.push(first);

        let worker = &worker;
        for (id, (rx, tx)) in receivers.into_iter().zip(senders).enumerate() {
            s.spawn(move || {
                let name = format!("thread#{id}");
                if let Err(err) = worker.run(&name, rx, tx) {
                    error!("{name}: {err}");
                }
            });
        }
    });

    Ok(())
}
