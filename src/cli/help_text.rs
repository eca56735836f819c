pub(super) const ROOT_LONG_ABOUT: &str = "\
Compare the metadata of two directory trees

Treecmp walks a left and a right directory tree and reports, for every relative path
found in either of them, whether the entry was added, deleted, modified or left
unchanged. Only metadata is compared (type, size, modification time and permission
bits); file contents are never read, which keeps the check fast even for large trees.

Typical uses are checking that a backup mirror or a deployed artifact tree still matches
its source.

COMPARISON RULES:

  - A path present only on the right is added, only on the left is deleted.
  - A directory on one side and a file on the other is modified (type), and nothing
    else is compared for that path.
  - Two directories are always unchanged.
  - Two files are modified when their sizes differ, their modification times are more
    than one second apart, or their rwx permission bits differ. Special bits such as
    setuid or sticky are ignored.
  - Symlinks are compared as entries of their own and never followed.

CONFIGURATION:

  The directories can be given with --left and --right, in a configuration file, or
  both (flags win). Without a CONFIG argument the first existing file of

    config/config.json
    config.json
    config/config.toml
    config.toml

  is used, unless both --left and --right are given. A configuration file looks like:

    {
      \"left_dir\": \"/srv/data\",
      \"right_dir\": \"/mnt/backup/data\",
      \"show_unchanged\": false
    }

  Files ending in .toml use the same keys in TOML syntax. Relative directories are
  resolved against the working directory.";

pub(super) const ROOT_AFTER_LONG_HELP: &str = "\
OUTPUT:

  One line per entry, sorted byte-wise by relative path:

    A  path   added (right only)
    D  path   deleted (left only)
    M  path   modified, followed by one indented line per differing attribute
    .  path   unchanged (only with --all)

  A summary line with the count of each status follows. With --format json a single
  JSON document with the same information is printed instead.

  Entries that cannot be read are skipped with a warning on stderr; the comparison
  continues with everything else.

EXIT STATUS:

  0    both trees match
  1    at least one entry was added, deleted or modified
  255  an error occurred (bad configuration, unreadable root directory, ...)

EXAMPLES:

  # Compare using config/config.json from the current directory
  $ treecmp

  # Compare two directories directly
  $ treecmp --left /srv/data --right /mnt/backup/data

  # Use a specific config file and list unchanged entries too
  $ treecmp --all /etc/treecmp/backup.toml

  # Machine-readable report
  $ treecmp -l ./build -r ./release --format json
";
