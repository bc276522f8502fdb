use std::io::{self, Write};

use crate::tree::{RepoTree, TreeNode};

const BRANCH: &str = "├── ";
const INDENT: &str = "│   ";

/// Prints the tree to stdout.
pub fn print_tree(tree: &RepoTree) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_tree(&mut out, tree)?;
    out.flush()
}

pub fn write_tree<W: Write>(out: &mut W, tree: &RepoTree) -> io::Result<()> {
    write_dir(out, &tree.name, &tree.root, "")
}

pub fn render_to_string(tree: &RepoTree) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_tree(&mut buf, tree);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Directory line, then its subdirectories in sorted order, then its files
/// in listing order.
fn write_dir<W: Write>(out: &mut W, name: &str, node: &TreeNode, prefix: &str) -> io::Result<()> {
    writeln!(out, "{}{}{}/", prefix, BRANCH, name)?;
    let child_prefix = format!("{}{}", prefix, INDENT);
    for (dir_name, child) in &node.subdirs {
        write_dir(out, dir_name, child, &child_prefix)?;
    }
    for file in &node.files {
        writeln!(out, "{}{}{}", child_prefix, BRANCH, file)?;
    }
    Ok(())
}
