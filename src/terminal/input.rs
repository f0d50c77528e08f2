use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use circular_buffer::CircularBuffer;
use log::warn;
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW, VMIN, VTIME};

use crate::snake::Direction;

type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const STDIN_FD: i32 = 0;
const ESC: u8 = 27;
const CSI: u8 = 91; // '['

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Arrow(Direction),
    Enter,
    Escape,
    Char(char),
}

/// Turns raw stdin bytes into keys. Arrow keys are 3 bytes long, ESC '[' and a letter.
#[derive(Debug)]
pub struct KeyDecoder {
    input_buffer: InputBuffer,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        KeyDecoder {
            input_buffer: InputBuffer::new(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        // if the buffer is full, ignore the input
        if self.input_buffer.is_full() {
            return;
        }
        self.input_buffer.push_back(byte);
    }

    /// Next complete key, or `None` if the buffer is empty or ends in a partial escape sequence.
    pub fn next_key(&mut self) -> Option<Key> {
        loop {
            let first = *self.input_buffer.front()?;
            if first != ESC {
                let _ = self.input_buffer.pop_front();
                match first {
                    b'\n' | b'\r' => return Some(Key::Enter),
                    b' '..=b'~' => return Some(Key::Char(first as char)),
                    _ => continue, // other control bytes
                }
            }
            match self.input_buffer.nth_front(1).copied() {
                // wait for the rest of the sequence, or for flush() on a quiet line
                None => return None,
                Some(CSI) => {}
                Some(_) => {
                    let _ = self.input_buffer.pop_front();
                    return Some(Key::Escape);
                }
            }
            let third = *self.input_buffer.nth_front(2)?;
            for _ in 0..3 {
                let _ = self.input_buffer.pop_front();
            }
            let direction = match third {
                65 => Direction::Up,
                66 => Direction::Down,
                67 => Direction::Right,
                68 => Direction::Left,
                _ => continue, // not an arrow
            };
            return Some(Key::Arrow(direction));
        }
    }

    /// Called when no byte arrived for a while: a dangling ESC was the Escape key itself.
    pub fn flush(&mut self) -> Option<Key> {
        if self.input_buffer.len() == 1 && self.input_buffer.front() == Some(&ESC) {
            self.input_buffer.clear();
            return Some(Key::Escape);
        }
        None
    }
}

/// Puts stdin in non-canonical, no-echo mode until dropped.
pub struct RawTerminal {
    old_termios: Termios,
}

impl RawTerminal {
    pub fn enable() -> io::Result<Self> {
        let old_termios = Termios::from_fd(STDIN_FD)?;
        let mut new_termios = old_termios;
        new_termios.c_lflag &= !(ICANON | ECHO); // no echo and canonical mode for stdin
        // reads return after one byte or after 100ms of silence
        new_termios.c_cc[VMIN] = 0;
        new_termios.c_cc[VTIME] = 1;
        tcsetattr(STDIN_FD, TCSANOW, &new_termios)?;
        Ok(RawTerminal { old_termios })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = tcsetattr(STDIN_FD, TCSANOW, &self.old_termios) {
            warn!("failed to restore terminal settings: {err}");
        }
    }
}

/// Reads stdin until `stop` is raised and hands every decoded key to the main loop.
pub fn spawn_input_thread(keys: Sender<Key>, stop: Arc<AtomicBool>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        let mut reader = io::stdin();
        let mut decoder = KeyDecoder::new();
        let mut buffer = [0u8; 1];
        while !stop.load(Ordering::Relaxed) {
            if reader.read(&mut buffer)? == 0 {
                if let Some(key) = decoder.flush() {
                    if !dispatch(&keys, key) {
                        break;
                    }
                }
                continue;
            }
            decoder.push(buffer[0]);
            while let Some(key) = decoder.next_key() {
                if !dispatch(&keys, key) {
                    // main loop is gone
                    return Ok(());
                }
            }
        }
        Ok(())
    })
}

/// `false` once the main loop has hung up.
pub(crate) fn dispatch(keys: &Sender<Key>, key: Key) -> bool {
    keys.send(key).is_ok()
}
