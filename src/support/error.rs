//-
// Copyright (c) 2020, Jason Lingle
//
// This file is part of Mimemail.
//
// Mimemail is free software: you can redistribute it and/or modify it under the
// terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// Mimemail is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Mimemail. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::mime::model::Address;

/// The decoding stage that was active when an I/O error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    LineBreakRemover,
    QuotedPrintable,
    EncodedWord,
    HeaderBlock,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Component::LineBreakRemover => "line break remover",
            Component::QuotedPrintable => "quoted-printable decoder",
            Component::EncodedWord => "encoded-word scanner",
            Component::HeaderBlock => "header block reader",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),
    #[error("Header field missing: {0}")]
    HeaderMissing(String),
    #[error("Address syntax error at byte {position}: {reason}")]
    AddressSyntax {
        position: usize,
        reason: &'static str,
        /// Addresses completed before the error.
        parsed: Vec<Address>,
    },
    #[error("I/O error in {component}: {source}")]
    Io {
        component: Component,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Moves this error through an `io::Error`, for use inside `Read`
    /// implementations.
    pub(crate) fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, self)
    }

    /// Recovers an error produced by one of the decoding readers.
    ///
    /// Errors that originated in this crate are unwrapped back to their
    /// original form; anything else came from the underlying source and is
    /// tagged with `component`.
    pub(crate) fn from_io(component: Component, e: io::Error) -> Self {
        if !e.get_ref().map_or(false, |inner| inner.is::<Error>()) {
            return Error::Io {
                component,
                source: e,
            };
        }

        match e.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(inner)) => *inner,
            // get_ref() above already found an `Error` inside
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_round_trip_preserves_crate_errors() {
        let e = Error::UnsupportedCharset("x-klingon".to_owned()).into_io();
        match Error::from_io(Component::EncodedWord, e) {
            Error::UnsupportedCharset(name) => assert_eq!("x-klingon", name),
            e => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn foreign_io_errors_are_annotated() {
        let e = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        match Error::from_io(Component::QuotedPrintable, e) {
            Error::Io { component, source } => {
                assert_eq!(Component::QuotedPrintable, component);
                assert_eq!(io::ErrorKind::BrokenPipe, source.kind());
            },
            e => panic!("Unexpected error: {:?}", e),
        }
    }
}
