//! Interactive correction of identifiers.
//!
//! Wraps the checks in [`crate::input_checkers`]: a rejected value is
//! reported, alternatives are listed, and the operator is asked again until a
//! valid value arrives. With `interactive` off the first rejection is
//! returned as an error.

use std::io::{BufRead, Write};

use anyhow::{Result, anyhow};

use crate::dataset::Dataset;
use crate::error::DataError;
use crate::input_checkers::{self, Checked, Rejection};
use crate::lookup::{self, GameMatch, PlayFilter, PlayResolution};
use crate::models::{PlayKey, TrackingSample};

pub struct Prompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: true,
        }
    }

    pub fn non_interactive(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DataError::InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    fn ask_number<T: std::str::FromStr>(&mut self, question: &str) -> Result<T> {
        loop {
            let raw = self.ask(question)?;
            match raw.parse::<T>() {
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.output, "{raw:?} is not a number")?,
            }
        }
    }

    /// Reports a rejection; fails outright when not interactive.
    fn reject(&mut self, rejection: &Rejection) -> Result<()> {
        if !self.interactive {
            return Err(anyhow!("{rejection}"));
        }
        writeln!(self.output, "{rejection}")?;
        Ok(())
    }

    pub fn team_code(&mut self, ds: &Dataset, code: &str) -> Result<String> {
        let mut code = code.to_string();
        loop {
            match input_checkers::team_code(ds, &code) {
                Checked::Valid(c) => return Ok(c),
                Checked::Invalid(r) => {
                    self.reject(&r)?;
                    code = self.ask("Team code: ")?;
                }
            }
        }
    }

    pub fn week_number(&mut self, week: i64) -> Result<u8> {
        let mut week = week;
        loop {
            match input_checkers::week_number(week) {
                Checked::Valid(w) => return Ok(w),
                Checked::Invalid(r) => {
                    self.reject(&r)?;
                    week = self.ask_number("Week: ")?;
                }
            }
        }
    }

    pub fn game_id(&mut self, ds: &Dataset, game_id: u64) -> Result<u64> {
        let mut game_id = game_id;
        loop {
            match input_checkers::game_id(ds, game_id) {
                Checked::Valid(g) => return Ok(g),
                Checked::Invalid(r) => {
                    self.reject(&r)?;
                    self.list_games(ds)?;
                    game_id = self.ask_number("Game ID: ")?;
                }
            }
        }
    }

    fn list_games(&mut self, ds: &Dataset) -> Result<()> {
        let by_week = self.ask("Narrow the list to one week? [y/N]: ")?;
        let week = if by_week.eq_ignore_ascii_case("y") || by_week.eq_ignore_ascii_case("yes") {
            let raw = self.ask_number("Week: ")?;
            Some(self.week_number(raw)?)
        } else {
            None
        };
        for choice in input_checkers::game_choices(ds, week) {
            writeln!(self.output, "{choice}")?;
        }
        Ok(())
    }

    pub fn play_id(&mut self, ds: &Dataset, game_id: u64, play_id: u64) -> Result<PlayKey> {
        let mut game_id = game_id;
        let mut play_id = play_id;
        loop {
            match input_checkers::play_id(ds, game_id, play_id) {
                Checked::Valid(key) => return Ok(key),
                Checked::Invalid(Rejection::UnknownGame { given, .. }) => {
                    game_id = self.game_id(ds, given)?;
                }
                Checked::Invalid(r) => {
                    self.reject(&r)?;
                    if let Rejection::UnknownPlay { options, .. } = &r {
                        for choice in options {
                            writeln!(self.output, "{choice}")?;
                        }
                    }
                    play_id = self.ask_number("Play ID: ")?;
                }
            }
        }
    }

    /// Confirms the play, then checks `frame` against the play's tracking.
    pub fn frame_no(
        &mut self,
        ds: &Dataset,
        key: PlayKey,
        frame: u32,
        tracking: &[TrackingSample],
    ) -> Result<u32> {
        let key = self.play_id(ds, key.game_id, key.play_id)?;
        let mut frame = frame;
        loop {
            match input_checkers::frame_no(ds, key, frame, tracking) {
                Checked::Valid(f) => return Ok(f),
                Checked::Invalid(Rejection::NoFrames { game_id, play_id }) => {
                    return Err(DataError::NoTracking { game_id, play_id }.into());
                }
                Checked::Invalid(r) => {
                    self.reject(&r)?;
                    frame = self.ask_number("Frame: ")?;
                }
            }
        }
    }

    /// Game between two clubs, trying the reversed pairing when `home` did
    /// not host. Both codes are asked for again when the clubs never met.
    pub fn game_from_teams(&mut self, ds: &Dataset, home: &str, away: &str) -> Result<u64> {
        let mut home = self.team_code(ds, home)?;
        let mut away = self.team_code(ds, away)?;
        loop {
            match lookup::game_id(ds, &home, &away) {
                GameMatch::Hosted(id) => return Ok(id),
                GameMatch::Reversed(id) => {
                    writeln!(self.output, "{away} hosted {home}; using game {id}")?;
                    return Ok(id);
                }
                GameMatch::NotPlayed => {
                    let msg = format!("{away} and {home} did not play each other");
                    if !self.interactive {
                        return Err(anyhow!(msg));
                    }
                    writeln!(self.output, "{msg}")?;
                    let h = self.ask("Home team: ")?;
                    home = self.team_code(ds, &h)?;
                    let a = self.ask("Away team: ")?;
                    away = self.team_code(ds, &a)?;
                }
            }
        }
    }

    /// Narrows a game's plays with filters. More filters, or a play ID, are
    /// asked for while several plays remain.
    pub fn resolve_play(
        &mut self,
        ds: &Dataset,
        game_id: u64,
        filters: &[PlayFilter],
    ) -> Result<PlayKey> {
        let game_id = self.game_id(ds, game_id)?;
        let mut filters = filters.to_vec();
        loop {
            let search = lookup::play_id(ds, game_id, &filters)?;
            for key in &search.ignored {
                writeln!(self.output, "{key} is not a play column and was ignored")?;
            }
            filters.retain(|f| !search.ignored.contains(&f.column));
            match search.resolution {
                PlayResolution::Unique(key) => return Ok(key),
                PlayResolution::NoMatch => {
                    let msg = format!("no play in game {game_id} matches those filters");
                    if !self.interactive {
                        return Err(anyhow!(msg));
                    }
                    writeln!(self.output, "{msg}")?;
                    for choice in input_checkers::play_choices(ds, game_id) {
                        writeln!(self.output, "{choice}")?;
                    }
                    let play_id = self.ask_number("Play ID: ")?;
                    return self.play_id(ds, game_id, play_id);
                }
                PlayResolution::Ambiguous(keys) => {
                    let msg = format!("{} plays match; narrow the search", keys.len());
                    if !self.interactive {
                        return Err(anyhow!(msg));
                    }
                    writeln!(self.output, "{msg}")?;
                    for key in &keys {
                        if let Some(p) = ds.play(key.game_id, key.play_id) {
                            writeln!(self.output, "{} -- {}", p.play_id, p.down_dist_summary)?;
                        }
                    }
                    let answer = self.ask("Play ID or key=value filter: ")?;
                    if let Some(filter) = PlayFilter::parse(&answer) {
                        filters.push(filter);
                    } else if let Ok(play_id) = answer.parse::<u64>() {
                        return self.play_id(ds, game_id, play_id);
                    } else {
                        writeln!(self.output, "{answer:?} is neither a play ID nor a filter")?;
                    }
                }
            }
        }
    }
}
