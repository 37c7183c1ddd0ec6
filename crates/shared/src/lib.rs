//! Process bootstrap shared by WhatsFest binaries

pub mod bootstrap;
