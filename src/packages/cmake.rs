// src/packages/cmake.rs

//! CMake: a cross-platform, open-source build system
//!
//! Bootstraps itself with its own `./bootstrap` script on Unix-like
//! platforms; on Windows a staged pre-built CMake configures the tree with
//! Ninja instead. The bootstrap argument list is flag-order sensitive: the
//! lone `--` token switches the script from bootstrap options to pass-through
//! CMake cache options, so everything after it must be a `-D` token.

use crate::build::{CMAKE_LIST_SEPARATOR, Invocation, Phase, Workspace, join_list};
use crate::error::Result;
use crate::packages::CMAKE_BUILD_TYPES;
use crate::recipe::{
    Checksum, Conflict, DependencyDecl, Guard, PatchDecl, Recipe, ResourceDecl, VariantDecl,
    VariantSetting, VersionDecl,
};
use crate::spec::{CompilerKind, Platform, Spec};
use crate::version::Version;
use regex::Regex;

pub struct Cmake;

impl Cmake {
    fn bootstrap_invocation(&self, spec: &Spec, ws: &Workspace) -> Result<Invocation> {
        let windows = spec.platform.is_windows_like();
        let mut args: Vec<String> = Vec::new();

        // The Intel compiler warns on noinline member functions of template
        // classes, and the bootstrap script treats the word 'warning' in its
        // probe output as a failure
        if spec.compiler_satisfies(CompilerKind::Intel, ":2021.6.0") {
            args.push("CXXFLAGS=-diag-disable=2196".to_string());
        }

        if windows {
            args.push("-GNinja".to_string());
            args.push(format!("-DCMAKE_INSTALL_PREFIX={}", ws.prefix.display()));
        } else {
            args.push(format!("--prefix={}", ws.prefix.display()));
            args.push(format!("--parallel={}", ws.jobs));

            if spec.bool_variant("ownlibs")? {
                // Build and link the vendored third-party libraries
                args.push("--no-system-libs".to_string());
            } else {
                // Link the externally installed third-party libraries
                args.push("--system-libs".to_string());

                if spec.satisfies("3.2:") {
                    // jsoncpp needs CMake to build; use the vendored copy to
                    // avoid the circular dependency
                    args.push("--no-system-jsoncpp".to_string());
                }
            }

            // Whatever +/~ownlibs, use the external curl so TLS library
            // selection stays with the resolver
            args.push("--system-curl".to_string());

            if spec.bool_variant("qt")? {
                args.push("--qt-gui".to_string());
            } else {
                args.push("--no-qt-gui".to_string());
            }

            if spec.bool_variant("doc")? {
                args.push("--sphinx-html".to_string());
                args.push("--sphinx-man".to_string());
            }

            // Everything after this token is forwarded to CMake unmodified
            args.push("--".to_string());
        }

        args.push(format!(
            "-DCMAKE_BUILD_TYPE={}",
            spec.choice_variant("build_type")?
        ));
        // Install correctly even when the build runs inside a ctest
        // environment
        args.push("-DCMake_TEST_INSTALL=OFF".to_string());
        args.push(format!(
            "-DBUILD_CursesDialog={}",
            if spec.bool_variant("ncurses")? { "ON" } else { "OFF" }
        ));

        // Let the installed cmake find its own dependencies
        args.push("-DCMAKE_INSTALL_RPATH_USE_LINK_PATH=ON".to_string());
        args.push(format!(
            "-DCMAKE_INSTALL_RPATH={}",
            join_list(&ws.rpaths, CMAKE_LIST_SEPARATOR)
        ));
        args.push(format!(
            "-DCMAKE_PREFIX_PATH={}",
            join_list(&ws.prefix_paths, CMAKE_LIST_SEPARATOR)
        ));

        let inv = if windows {
            // The staged pre-built CMake configures the tree in place
            let bootstrap_exe = ws
                .source_dir
                .join("cmake-bootstrap")
                .join("bin")
                .join("cmake.exe");
            Invocation::new(bootstrap_exe.display().to_string())
                .args(args)
                .arg(".")
        } else {
            Invocation::new("./bootstrap").args(args)
        };
        Ok(inv.current_dir(&ws.source_dir))
    }

    fn generator(&self, spec: &Spec) -> &'static str {
        if spec.platform.is_windows_like() { "ninja" } else { "make" }
    }
}

impl Recipe for Cmake {
    fn name(&self) -> &'static str {
        "cmake"
    }

    fn homepage(&self) -> &'static str {
        "https://www.cmake.org"
    }

    fn url_for_version(&self, version: &Version) -> String {
        format!(
            "https://github.com/Kitware/CMake/releases/download/v{0}/cmake-{0}.tar.gz",
            version
        )
    }

    fn versions(&self) -> Vec<VersionDecl> {
        vec![
            VersionDecl::branch("master", "master"),
            VersionDecl::sha256(
                "3.26.3",
                "bbd8d39217509d163cb544a40d6428ac666ddc83e22905d3e52c925781f0f659",
            ),
        ]
    }

    fn variants(&self) -> Vec<VariantDecl> {
        vec![
            VariantDecl::choice("build_type", "Release", CMAKE_BUILD_TYPES, "CMake build type"),
            // Vendored libraries greatly speed up the CMake build, and CMake
            // is almost always a pure build dependency
            VariantDecl::switch("ownlibs", true, "Use CMake-provided third-party libraries"),
            VariantDecl::switch("qt", false, "Enables the build of cmake-gui"),
            VariantDecl::switch(
                "doc",
                false,
                "Enables the generation of html and man page documentation",
            ),
            // Declaration defaults are platform-independent; resolvers
            // targeting windows are expected to resolve this to off
            VariantDecl::switch("ncurses", true, "Enables the build of the ncurses gui"),
        ]
    }

    fn dependencies(&self) -> Vec<DependencyDecl> {
        vec![
            DependencyDecl::new("ninja").when(Guard::platform(Platform::Windows)),
            // External curl even with +ownlibs, so TLS library conflicts stay
            // on the curl package
            DependencyDecl::new("curl"),
            // curl already depends on zlib, so cmake picks the external one
            // up anyway; depend on it unconditionally
            DependencyDecl::new("zlib"),
            DependencyDecl::new("expat").when(Guard::variant_off("ownlibs")),
            DependencyDecl::new("libarchive")
                .range("3.1.0:")
                .when(Guard::variant_off("ownlibs"))
                .setting(VariantSetting::Eq("xar", "expat"))
                .setting(VariantSetting::Eq("compression", "zlib")),
            DependencyDecl::new("libarchive")
                .range("3.3.3:")
                .when(Guard::all([
                    Guard::variant_off("ownlibs"),
                    Guard::version("3.15.0:"),
                ])),
            DependencyDecl::new("libuv")
                .range("1.0.0:1.10")
                .when(Guard::all([
                    Guard::variant_off("ownlibs"),
                    Guard::version("3.7.0:3.10.3"),
                ])),
            DependencyDecl::new("libuv")
                .range("1.10.0:1.10")
                .when(Guard::all([
                    Guard::variant_off("ownlibs"),
                    Guard::version("3.11.0:3.11"),
                ])),
            DependencyDecl::new("libuv")
                .range("1.10.0:")
                .when(Guard::all([
                    Guard::variant_off("ownlibs"),
                    Guard::version("3.12.0:"),
                ])),
            DependencyDecl::new("rhash").when(Guard::all([
                Guard::variant_off("ownlibs"),
                Guard::version("3.8.0:"),
            ])),
            DependencyDecl::new("qt").when(Guard::variant_on("qt")),
            DependencyDecl::new("ncurses").when(Guard::variant_on("ncurses")),
            DependencyDecl::new("python")
                .range("2.7.11:")
                .when(Guard::variant_on("doc"))
                .build_only(),
            DependencyDecl::new("py-sphinx")
                .when(Guard::variant_on("doc"))
                .build_only(),
        ]
    }

    fn patches(&self) -> Vec<PatchDecl> {
        vec![
            // Revert the change that broke mpi link-flag parsing
            PatchDecl::new("cmake-revert-findmpi-link-flag-list.patch")
                .when(Guard::version("3.15.0")),
            PatchDecl::new("blas-cray.patch").when(Guard::version("3.26.3")),
            // Linker error with external libs on darwin
            PatchDecl::new("cmake-macos-add-coreservices.patch")
                .when(Guard::version("3.11.0:3.13.3")),
            // XLF with the Ninja generator
            PatchDecl::new("fix-xlf-ninja-mr-4075.patch")
                .sha256("42d8b2163a2f37a745800ec13a96c08a3a20d5e67af51031e51f63313d0dedd1")
                .when(Guard::version("3.15.5")),
            PatchDecl::new("intel-c-gnu11.patch").when(Guard::version("3.6.0:3.6.1")),
            PatchDecl::new("intel-cxx-bootstrap.patch")
                .when(Guard::version("3.17.0:3.17.3,3.18.0")),
            PatchDecl::new("nag-response-files.patch").when(Guard::version("3.7:3.12")),
            // Cray libhugetlbfs and icpc warnings failing CXX probes
            PatchDecl::new("ignore_crayxc_warnings.patch").when(Guard::version("3.7:3.17.2")),
            // Fujitsu needs --linkfortran to combine C++ and Fortran
            PatchDecl::new("fujitsu_add_linker_option.patch")
                .when(Guard::compiler(CompilerKind::Fj)),
            // Remove -A from the C++ flags used when CXX_EXTENSIONS is OFF
            PatchDecl::new("pgi-cxx-ansi.patch").when(Guard::version("3.15:3.18")),
            // CCE v11+ fortran preprocessing definition
            PatchDecl::new("5882-enable-cce-fortran-preprocessing.patch")
                .sha256("b48396c0e4f61756248156b6cebe9bc0d7a22228639b47b5aa77c9330588ce88")
                .when(Guard::version("3.19.0:3.19")),
        ]
    }

    fn resources(&self) -> Vec<ResourceDecl> {
        vec![
            ResourceDecl::new(
                "cmake-bootstrap",
                "https://cmake.org/files/v3.21/cmake-3.21.2-windows-x86_64.zip",
                Checksum::Sha256(
                    "213a4e6485b711cb0a48cbd97b10dfe161a46bfe37b8f3205f47e99ffec434d2",
                ),
                "cmake-bootstrap",
            )
            .when(Guard::all([
                Guard::version("3.0.2:"),
                Guard::platform(Platform::Windows),
            ])),
            ResourceDecl::new(
                "cmake-bootstrap",
                "https://cmake.org/files/v2.8/cmake-2.8.4-win32-x86.zip",
                Checksum::Sha256(
                    "8b9b520f3372ce67e33d086421c1cb29a5826d0b9b074f44a8a0304e44cf88f3",
                ),
                "cmake-bootstrap",
            )
            .when(Guard::all([
                Guard::version(":2.8.10.2"),
                Guard::platform(Platform::Windows),
            ])),
        ]
    }

    fn conflicts(&self) -> Vec<Conflict> {
        vec![
            Conflict::new(
                Guard::all([
                    Guard::compiler(CompilerKind::Gcc),
                    Guard::platform(Platform::Darwin),
                    Guard::version(":3.17"),
                ]),
                "CMake <3.18 does not compile with GCC on macOS; use apple-clang or a newer \
                 CMake release",
            ),
            // Vendored dependencies do not build with nvhpc, and patching
            // external copies is more transparent anyway
            Conflict::new(
                Guard::all([
                    Guard::variant_on("ownlibs"),
                    Guard::compiler(CompilerKind::Nvhpc),
                ]),
                "vendored third-party libraries do not build with nvhpc",
            ),
            // curl does not yet build with the Windows SSL implementation
            Conflict::new(
                Guard::all([
                    Guard::variant_off("ownlibs"),
                    Guard::platform(Platform::Windows),
                ]),
                "external third-party libraries are not supported on windows",
            ),
            Conflict::new(
                Guard::all([Guard::variant_on("qt"), Guard::dependency_in("qt", "5.4.0")]),
                "qt-5.4.0 has broken CMake modules",
            ),
            Conflict::new(
                Guard::all([
                    Guard::compiler(CompilerKind::Intel),
                    Guard::version("3.11.0:3.11.4"),
                ]),
                "this release does not build with the Intel compiler",
            ),
            Conflict::new(
                Guard::all([
                    Guard::compiler_in(CompilerKind::Intel, ":14"),
                    Guard::version("3.14:"),
                ]),
                "Intel 14 has immature C++11 support",
            ),
        ]
    }

    fn phases(&self) -> &'static [Phase] {
        &[Phase::Bootstrap, Phase::Build, Phase::Test, Phase::Install]
    }

    fn plan(&self, phase: Phase, spec: &Spec, ws: &Workspace) -> Result<Option<Invocation>> {
        let generator = self.generator(spec);
        let inv = match phase {
            Phase::Bootstrap => self.bootstrap_invocation(spec, ws)?,
            Phase::Build => Invocation::new(generator)
                .arg(format!("-j{}", ws.jobs))
                .current_dir(&ws.source_dir),
            Phase::Test => {
                // Some tests fail and the suite takes forever; opt-in only
                if !ws.run_tests {
                    return Ok(None);
                }
                Invocation::new(generator)
                    .arg("test")
                    .current_dir(&ws.source_dir)
            }
            Phase::Install => Invocation::new(generator)
                .arg("install")
                .current_dir(&ws.source_dir),
            Phase::Edit => return Ok(None),
        };
        Ok(Some(inv))
    }

    fn determine_version(&self, output: &str) -> Option<Version> {
        let re = Regex::new(r"cmake.*version\s+(\S+)").ok()?;
        let captures = re.captures(output)?;
        Some(Version::parse(&captures[1]))
    }
}
