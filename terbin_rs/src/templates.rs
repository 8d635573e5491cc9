//! Source templates rendered from the project manifest.

use crate::manifest::ProjectManifest;

const FALLBACK_VERSION: &str = "0.0.0";

fn version_of(manifest: &ProjectManifest) -> &str {
    manifest.current_version().unwrap_or(FALLBACK_VERSION)
}

/// `plugin.cs`: the BepInEx entry point.
pub fn plugin_cs(manifest: &ProjectManifest) -> String {
    let name = &manifest.name;
    let guid = &manifest.guid;
    let version = version_of(manifest);
    format!(
        r#"using BepInEx;
using BepInEx.Logging;

namespace {name};

[BepInPlugin("{guid}", "{name}", "{version}")]
public class Plugin : BaseUnityPlugin
{{
    internal static new ManualLogSource Logger;

    private void Awake()
    {{
        // Plugin startup logic
        Logger = base.Logger;
        Logger.LogInfo($"Plugin '{guid}' is loaded!");
    }}
}}
"#
    )
}

/// `<Name>.csproj` targeting net45 with the game DLLs from `libs/` as references.
pub fn csproj(manifest: &ProjectManifest) -> String {
    let name = &manifest.name;
    let version = version_of(manifest);
    format!(
        r#"<Project Sdk="Microsoft.NET.Sdk">
    <PropertyGroup>
        <TargetFramework>net45</TargetFramework>
        <AssemblyName>{name}</AssemblyName>
        <Product>Mod created using Terbin</Product>
        <Version>{version}</Version>
        <AllowUnsafeBlocks>true</AllowUnsafeBlocks>
        <LangVersion>latest</LangVersion>
        <RestoreAdditionalProjectSources>
        https://api.nuget.org/v3/index.json;
        https://nuget.bepinex.dev/v3/index.json;
        https://nuget.samboy.dev/v3/index.json
        </RestoreAdditionalProjectSources>
        <RootNamespace>{name}</RootNamespace>
    </PropertyGroup>

    <ItemGroup>
        <PackageReference Include="BepInEx.Analyzers" Version="1.*" PrivateAssets="all" />
        <PackageReference Include="BepInEx.Core" Version="5.*" />
    </ItemGroup>

    <ItemGroup>
        <LibAssemblies Include="libs\**\*.dll" />
    </ItemGroup>

    <ItemGroup>
        <Reference Include="@(LibAssemblies)">
            <Private>false</Private>
        </Reference>
    </ItemGroup>

    <ItemGroup Condition="'$(TargetFramework.TrimEnd(`0123456789`))' == 'net'">
        <PackageReference Include="Microsoft.NETFramework.ReferenceAssemblies" Version="1.0.2" PrivateAssets="all" />
    </ItemGroup>
</Project>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectManifest {
        let mut manifest = ProjectManifest::default();
        manifest.name = "CoolMod".into();
        manifest.guid = "fm.cool".into();
        manifest
    }

    #[test]
    fn test_plugin_attribute() {
        let mut manifest = sample();
        assert!(plugin_cs(&manifest).contains(r#"[BepInPlugin("fm.cool", "CoolMod", "0.0.0")]"#));

        manifest.versions = vec!["1.0.0".into(), "1.2.0".into()];
        let plugin = plugin_cs(&manifest);
        assert!(plugin.contains(r#"[BepInPlugin("fm.cool", "CoolMod", "1.2.0")]"#));
        assert!(plugin.contains("namespace CoolMod;"));
        assert!(plugin.contains("public class Plugin : BaseUnityPlugin\n{"));
    }

    #[test]
    fn test_csproj_essentials() {
        let project = csproj(&sample());
        assert!(project.contains("<TargetFramework>net45</TargetFramework>"));
        assert!(project.contains("<AssemblyName>CoolMod</AssemblyName>"));
        assert!(project.contains(r#"<LibAssemblies Include="libs\**\*.dll" />"#));
        assert!(project.contains("<Private>false</Private>"));
        assert!(project.contains("https://nuget.bepinex.dev/v3/index.json"));
    }
}
