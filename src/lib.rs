use anyhow::Error;

pub mod concat_writer;
pub mod state;
pub mod timestamp;


use crate::state::Opt;

/// Read the whole clip table, then render and write it. The output file is only
/// created once every clip has rendered.
pub fn run(opt: &Opt) -> Result<(), Error> {
    let ts_list = concat_writer::read_file(opt)?;
    concat_writer::write_file(opt, &ts_list)
}
